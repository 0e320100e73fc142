use serde::{Deserialize, Serialize};

/// An album as seen by one user: `favorite` is that user's flag.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: i64,
    pub title: String,
    pub parent_album_id: Option<i64>,
    pub path: String,
    pub cover_id: Option<i64>,
    pub favorite: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl Album {
    /// Maps a row selected with `queries::albums::COLUMNS`.
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Album {
            id: row.get(0)?,
            title: row.get(1)?,
            parent_album_id: row.get(2)?,
            path: row.get(3)?,
            cover_id: row.get(4)?,
            favorite: row.get(5)?,
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumFilter {
    pub only_root: Option<bool>,
    pub show_empty: Option<bool>,
    pub only_with_favorites: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ordering {
    pub order_by: Option<String>,
    pub order_direction: Option<OrderDirection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumListRequest {
    #[serde(flatten)]
    pub filter: AlbumFilter,
    pub order: Option<Ordering>,
    pub paginate: Option<Pagination>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumGetRequest {
    pub album_id: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumPathRequest {
    pub album_id: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumSetCoverRequest {
    pub media_id: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumResetCoverRequest {
    pub album_id: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumListResponse {
    pub albums: Vec<Album>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumPathResponse {
    pub path: Vec<Album>,
}
