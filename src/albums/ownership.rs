use std::collections::HashSet;

use rusqlite::Connection;

use crate::database::{fetch_all, queries};
use crate::error::AppResult;

/// An album owned by the user, with just enough of the tree to find roots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnedAlbum {
    pub id: i64,
    pub parent_album_id: Option<i64>,
}

/// The set of albums one user may see and modify, fixed for the lifetime of
/// a request.
#[derive(Debug, Clone)]
pub struct OwnershipIndex {
    user_id: i64,
    albums: Vec<OwnedAlbum>,
    ids: HashSet<i64>,
}

impl OwnershipIndex {
    pub fn new(user_id: i64, mut albums: Vec<OwnedAlbum>) -> Self {
        albums.sort_by_key(|album| album.id);
        albums.dedup_by_key(|album| album.id);
        let ids = albums.iter().map(|album| album.id).collect();

        Self {
            user_id,
            albums,
            ids,
        }
    }

    pub fn load(conn: &Connection, user_id: i64) -> AppResult<Self> {
        let albums = fetch_all(
            conn,
            queries::ownership::SELECT_OWNED_ALBUMS,
            &[&user_id],
            |row| {
                Ok(OwnedAlbum {
                    id: row.get(0)?,
                    parent_album_id: row.get(1)?,
                })
            },
        )?;

        tracing::debug!(user_id, owned = albums.len(), "Loaded album ownership");
        Ok(Self::new(user_id, albums))
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn owns(&self, album_id: i64) -> bool {
        self.ids.contains(&album_id)
    }

    /// The only owned album without a parent, if there is exactly one.
    pub fn single_root(&self) -> Option<i64> {
        let mut roots = self
            .albums
            .iter()
            .filter(|album| album.parent_album_id.is_none());

        match (roots.next(), roots.next()) {
            (Some(root), None) => Some(root.id),
            _ => None,
        }
    }

    /// Owned album IDs in ascending order.
    pub fn owned_ids(&self) -> Vec<i64> {
        self.albums.iter().map(|album| album.id).collect()
    }

    pub fn len(&self) -> usize {
        self.albums.len()
    }

    pub fn is_empty(&self) -> bool {
        self.albums.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_album, create_test_db, create_test_user, grant_album_access};

    fn owned(id: i64, parent_album_id: Option<i64>) -> OwnedAlbum {
        OwnedAlbum { id, parent_album_id }
    }

    #[test]
    fn test_owns_is_set_membership() {
        let index = OwnershipIndex::new(7, vec![owned(1, None), owned(2, Some(1))]);

        assert!(index.owns(1));
        assert!(index.owns(2));
        assert!(!index.owns(3));
        assert_eq!(index.user_id(), 7);
    }

    #[test]
    fn test_single_root_with_disjoint_subtrees() {
        // 10 is parentless; 20 and 30 hang off albums the user does not own
        let index = OwnershipIndex::new(
            1,
            vec![owned(10, None), owned(11, Some(10)), owned(20, Some(5)), owned(30, Some(6))],
        );

        assert_eq!(index.single_root(), Some(10));
    }

    #[test]
    fn test_two_parentless_albums_have_no_single_root() {
        let index = OwnershipIndex::new(1, vec![owned(1, None), owned(2, None), owned(3, Some(1))]);
        assert_eq!(index.single_root(), None);
    }

    #[test]
    fn test_no_parentless_album_has_no_single_root() {
        let index = OwnershipIndex::new(1, vec![owned(2, Some(1)), owned(3, Some(1))]);
        assert_eq!(index.single_root(), None);
    }

    #[test]
    fn test_empty_index() {
        let index = OwnershipIndex::new(1, Vec::new());

        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
        assert_eq!(index.single_root(), None);
        assert!(index.owned_ids().is_empty());
    }

    #[test]
    fn test_owned_ids_are_sorted_and_unique() {
        let index = OwnershipIndex::new(1, vec![owned(5, None), owned(2, Some(5)), owned(5, None)]);
        assert_eq!(index.owned_ids(), vec![2, 5]);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_load_reads_user_albums() {
        let pool = create_test_db();
        let conn = pool.get().expect("Failed to get connection");

        let alice = create_test_user(&conn, "alice");
        let bob = create_test_user(&conn, "bob");
        let root = create_test_album(&conn, "root", None);
        let child = create_test_album(&conn, "child", Some(root));
        let other = create_test_album(&conn, "other", None);

        grant_album_access(&conn, alice, root);
        grant_album_access(&conn, alice, child);
        grant_album_access(&conn, bob, other);

        let index = OwnershipIndex::load(&conn, alice).expect("Failed to load ownership");

        assert_eq!(index.owned_ids(), vec![root, child]);
        assert_eq!(index.single_root(), Some(root));
        assert!(!index.owns(other));
    }
}
