use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    pub id: i64,
    pub title: String,
    pub path: String,
    pub album_id: i64,
    pub created_at: String,
}

impl Media {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Media {
            id: row.get(0)?,
            title: row.get(1)?,
            path: row.get(2)?,
            album_id: row.get(3)?,
            created_at: row.get(4)?,
        })
    }
}
