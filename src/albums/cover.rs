use rusqlite::{Connection, Transaction, TransactionBehavior};
use tracing::{info, warn};

use crate::albums::{fetch_owned_album, OwnershipIndex};
use crate::database::{execute_query, fetch_one, queries};
use crate::error::{AppError, AppResult};
use crate::models::{Album, Media};

/// Makes `media_id` the cover of the album that contains it.
pub fn set_album_cover(conn: &mut Connection, ownership: &OwnershipIndex, media_id: i64) -> AppResult<Album> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let media = fetch_one(&tx, queries::media::SELECT_BY_ID, &[&media_id], Media::from_row)?
        .ok_or_else(|| AppError::NotFound("Media not found".to_string()))?;

    let album = fetch_owned_album(&tx, ownership, media.album_id)?;
    let updated = write_cover(&tx, ownership, album.id, Some(media.id))?;
    tx.commit()?;

    info!(user_id = ownership.user_id(), album_id = updated.id, media_id, "Album cover set");
    Ok(updated)
}

pub fn reset_album_cover(conn: &mut Connection, ownership: &OwnershipIndex, album_id: i64) -> AppResult<Album> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    fetch_owned_album(&tx, ownership, album_id)?;
    let updated = write_cover(&tx, ownership, album_id, None)?;
    tx.commit()?;

    info!(user_id = ownership.user_id(), album_id, "Album cover reset");
    Ok(updated)
}

/// The update re-checks `user_albums` inside the transaction, so a grant
/// revoked after the index was loaded still blocks the write.
fn write_cover(
    tx: &Transaction<'_>,
    ownership: &OwnershipIndex,
    album_id: i64,
    cover_id: Option<i64>,
) -> AppResult<Album> {
    let changed = execute_query(
        tx,
        queries::albums::UPDATE_COVER_IF_OWNED,
        &[&cover_id, &album_id, &ownership.user_id()],
    )?;

    if changed == 0 {
        warn!(user_id = ownership.user_id(), album_id, "Album ownership revoked before cover update");
        return Err(AppError::Forbidden("Album access denied".to_string()));
    }

    fetch_one(
        tx,
        queries::albums::SELECT_BY_ID_FOR_USER,
        &[&ownership.user_id(), &album_id],
        Album::from_row,
    )?
    .ok_or_else(|| AppError::NotFound("Album not found".to_string()))
}
