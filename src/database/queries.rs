pub mod albums {
    /// Column list shared by every album read; `uad` is the requesting user's
    /// `user_album_data` row.
    pub const COLUMNS: &str = r#"
           a.id
         , a.title
         , a.parent_album_id
         , a.path
         , a.cover_id
         , COALESCE(uad.favorite, 0) AS favorite
         , a.created_at
         , a.updated_at
    "#;

    pub const FROM_WITH_FAVORITE: &str = r#"
      FROM albums AS a
      LEFT JOIN user_album_data AS uad ON uad.album_id = a.id AND uad.user_id = ?
    "#;

    pub const SELECT_BY_ID_FOR_USER: &str = r#"
    SELECT a.id
         , a.title
         , a.parent_album_id
         , a.path
         , a.cover_id
         , COALESCE(uad.favorite, 0) AS favorite
         , a.created_at
         , a.updated_at
      FROM albums AS a
      LEFT JOIN user_album_data AS uad ON uad.album_id = a.id AND uad.user_id = ?
     WHERE a.id = ?
    "#;

    pub const UPDATE_COVER_IF_OWNED: &str = r#"
    UPDATE albums
       SET cover_id = ?
         , updated_at = datetime('now')
     WHERE id = ?
       AND EXISTS (
           SELECT 1
             FROM user_albums AS ua
            WHERE ua.album_id = albums.id
              AND ua.user_id = ?
       )
    "#;
}

pub mod media {
    pub const SELECT_BY_ID: &str = r#"
    SELECT id
         , title
         , path
         , album_id
         , created_at
      FROM media
     WHERE id = ?
    "#;
}

pub mod ownership {
    pub const SELECT_OWNED_ALBUMS: &str = r#"
    SELECT a.id
         , a.parent_album_id
      FROM user_albums AS ua
      JOIN albums AS a ON a.id = ua.album_id
     WHERE ua.user_id = ?
     ORDER BY a.id
    "#;

    /// Subquery form of the owned set, bound with a single user id.
    pub const OWNED_ALBUM_IDS: &str = "SELECT ua.album_id FROM user_albums AS ua WHERE ua.user_id = ?";
}

pub mod auth {
    pub const SELECT_USER_FOR_TOKEN: &str = r#"
    SELECT id
         , username
         , is_active
      FROM users
     WHERE id = ?
    "#;
}
