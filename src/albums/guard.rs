use rusqlite::Connection;
use tracing::warn;

use crate::albums::OwnershipIndex;
use crate::database::{fetch_one, queries};
use crate::error::{AppError, AppResult};
use crate::models::Album;

/// Loads an album the user owns, telling a missing album apart from one the
/// user may not see.
pub fn fetch_owned_album(conn: &Connection, ownership: &OwnershipIndex, album_id: i64) -> AppResult<Album> {
    let album = fetch_one(
        conn,
        queries::albums::SELECT_BY_ID_FOR_USER,
        &[&ownership.user_id(), &album_id],
        Album::from_row,
    )?
    .ok_or_else(|| AppError::NotFound("Album not found".to_string()))?;

    if !ownership.owns(album.id) {
        warn!(user_id = ownership.user_id(), album_id, "Denied access to album");
        return Err(AppError::Forbidden("Album access denied".to_string()));
    }

    Ok(album)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{
        create_test_album, create_test_db, create_test_user, favorite_album, grant_album_access,
    };

    #[test]
    fn test_owned_album_is_returned_with_favorite_flag() {
        let pool = create_test_db();
        let conn = pool.get().expect("Failed to get connection");
        let user = create_test_user(&conn, "alice");
        let album = create_test_album(&conn, "Holidays", None);
        grant_album_access(&conn, user, album);
        favorite_album(&conn, user, album);

        let ownership = OwnershipIndex::load(&conn, user).expect("Failed to load ownership");
        let fetched = fetch_owned_album(&conn, &ownership, album).expect("fetch failed");

        assert_eq!(fetched.id, album);
        assert_eq!(fetched.title, "Holidays");
        assert_eq!(fetched.parent_album_id, None);
        assert!(fetched.favorite);
    }

    #[test]
    fn test_missing_album_is_not_found() {
        let pool = create_test_db();
        let conn = pool.get().expect("Failed to get connection");
        let user = create_test_user(&conn, "alice");
        let ownership = OwnershipIndex::load(&conn, user).expect("Failed to load ownership");

        let err = fetch_owned_album(&conn, &ownership, 4242).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_unowned_album_is_forbidden() {
        let pool = create_test_db();
        let conn = pool.get().expect("Failed to get connection");
        let alice = create_test_user(&conn, "alice");
        let bob = create_test_user(&conn, "bob");
        let album = create_test_album(&conn, "Bob's", None);
        grant_album_access(&conn, bob, album);

        let ownership = OwnershipIndex::load(&conn, alice).expect("Failed to load ownership");

        let err = fetch_owned_album(&conn, &ownership, album).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }
}
