use std::collections::HashSet;

use rusqlite::Connection;
use tracing::{debug, warn};

use crate::albums::{fetch_owned_album, OwnershipIndex};
use crate::database::{fetch_one, queries};
use crate::error::{AppError, AppResult};
use crate::models::Album;

/// Ancestors of `album_id` the user can see, root-first, excluding the album.
pub fn album_path(
    conn: &Connection,
    ownership: &OwnershipIndex,
    album_id: i64,
    max_depth: usize,
) -> AppResult<Vec<Album>> {
    let album = fetch_owned_album(conn, ownership, album_id)?;
    resolve_ancestors(conn, ownership, &album, max_depth)
}

/// Walks parent links upward from `album` and keeps the unbroken run of
/// owned ancestors next to it. The walk ends at the first unowned ancestor,
/// so nothing above the user's ownership boundary is ever read or returned.
pub fn resolve_ancestors(
    conn: &Connection,
    ownership: &OwnershipIndex,
    album: &Album,
    max_depth: usize,
) -> AppResult<Vec<Album>> {
    let mut path = Vec::new();
    let mut visited = HashSet::from([album.id]);
    let mut next = album.parent_album_id;

    while let Some(parent_id) = next {
        if !visited.insert(parent_id) {
            return Err(AppError::Internal(format!(
                "Album hierarchy above {} contains a cycle at {}",
                album.id, parent_id
            )));
        }

        if !ownership.owns(parent_id) {
            debug!(album_id = album.id, boundary = parent_id, "Path truncated at unowned album");
            break;
        }

        if path.len() >= max_depth {
            return Err(AppError::Internal(format!(
                "Album hierarchy above {} exceeds {} levels",
                album.id, max_depth
            )));
        }

        let parent = fetch_one(
            conn,
            queries::albums::SELECT_BY_ID_FOR_USER,
            &[&ownership.user_id(), &parent_id],
            Album::from_row,
        )?;

        let Some(parent) = parent else {
            warn!(album_id = album.id, parent_id, "Album references a missing parent");
            break;
        };

        next = parent.parent_album_id;
        path.push(parent);
    }

    path.reverse();
    Ok(path)
}
