#![cfg(test)]

use crate::app::create_app;
use crate::auth::create_access_token;
use crate::config::Config;
use crate::database::{init_database, insert_returning_id, DbPool};
use axum::http::HeaderValue;
use axum::Router;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use std::sync::Arc;

/// Create an in-memory SQLite database pool with full schema applied.
///
/// Every `:memory:` connection is its own database, so the pool holds a
/// single connection; drop it before handing the pool to a handler.
pub fn create_test_db() -> DbPool {
    let manager = SqliteConnectionManager::memory().with_init(|conn| {
        conn.execute_batch("PRAGMA foreign_keys = ON")?;
        Ok(())
    });

    let pool = Pool::builder()
        .max_size(1)
        .build(manager)
        .expect("Failed to create test database pool");

    let conn = pool.get().expect("Failed to get connection from pool");
    init_database(&conn).expect("Failed to initialize test database schema");

    pool
}

/// Create a test app with in-memory database
pub fn create_test_app() -> (Router, DbPool) {
    let pool = create_test_db();
    let config = Arc::new(Config::default());
    let app = create_app(config, pool.clone());
    (app, pool)
}

/// Authorization header for a user, signed with the default config secret
pub fn bearer_for(user_id: i64, username: &str) -> HeaderValue {
    let token = create_access_token(user_id, username, &Config::default())
        .expect("Failed to create access token");
    HeaderValue::from_str(&format!("Bearer {}", token)).expect("Invalid header value")
}

pub fn create_test_user(conn: &Connection, username: &str) -> i64 {
    insert_returning_id(conn, "INSERT INTO users (username) VALUES (?)", &[&username])
        .expect("Failed to insert test user")
}

pub fn create_test_album(conn: &Connection, title: &str, parent_album_id: Option<i64>) -> i64 {
    let path = format!("/photos/{}", title);
    insert_returning_id(
        conn,
        "INSERT INTO albums (title, parent_album_id, path) VALUES (?, ?, ?)",
        &[&title, &parent_album_id, &path],
    )
    .expect("Failed to insert test album")
}

pub fn create_test_media(conn: &Connection, album_id: i64, title: &str) -> i64 {
    let path = format!("/photos/{}/{}", album_id, title);
    insert_returning_id(
        conn,
        "INSERT INTO media (title, path, album_id) VALUES (?, ?, ?)",
        &[&title, &path, &album_id],
    )
    .expect("Failed to insert test media")
}

pub fn grant_album_access(conn: &Connection, user_id: i64, album_id: i64) {
    conn.execute(
        "INSERT OR IGNORE INTO user_albums (user_id, album_id) VALUES (?, ?)",
        [user_id, album_id],
    )
    .expect("Failed to grant album access");
}

pub fn favorite_album(conn: &Connection, user_id: i64, album_id: i64) {
    conn.execute(
        "INSERT OR REPLACE INTO user_album_data (user_id, album_id, favorite) VALUES (?, ?, 1)",
        [user_id, album_id],
    )
    .expect("Failed to favorite album");
}

pub fn favorite_media(conn: &Connection, user_id: i64, media_id: i64) {
    conn.execute(
        "INSERT OR REPLACE INTO user_media_data (user_id, media_id, favorite) VALUES (?, ?, 1)",
        [user_id, media_id],
    )
    .expect("Failed to favorite media");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_db() {
        let pool = create_test_db();
        let conn = pool.get().expect("Failed to get connection");

        let result: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='albums'",
                [],
                |row| row.get(0),
            )
            .expect("Failed to query schema");

        assert_eq!(result, 1);
    }

    #[test]
    fn test_fixtures_link_albums_and_media() {
        let pool = create_test_db();
        let conn = pool.get().expect("Failed to get connection");

        let root = create_test_album(&conn, "root", None);
        let child = create_test_album(&conn, "child", Some(root));
        let media = create_test_media(&conn, child, "photo.jpg");

        let (parent, album_id): (Option<i64>, i64) = conn
            .query_row(
                "SELECT a.parent_album_id, m.album_id FROM media AS m JOIN albums AS a ON a.id = m.album_id WHERE m.id = ?",
                [media],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .expect("Failed to query fixtures");

        assert_eq!(parent, Some(root));
        assert_eq!(album_id, child);
    }

    #[test]
    fn test_create_test_app() {
        let (_app, _pool) = create_test_app();
    }
}
