use crate::error::AppResult;
use rusqlite::Connection;

const SCHEMA: &str = include_str!("../../schema.sql");

pub fn init_database(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_database_is_idempotent() {
        let conn = Connection::open_in_memory().expect("Failed to open database");
        init_database(&conn).expect("First init failed");
        init_database(&conn).expect("Second init failed");

        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('albums', 'media', 'user_albums', 'user_album_data', 'user_media_data')",
                [],
                |row| row.get(0),
            )
            .expect("Failed to count tables");
        assert_eq!(tables, 5);
    }
}
