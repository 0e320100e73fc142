//! Composition of the "albums visible to this user" query.
//!
//! The listing is built by folding an [`AlbumQuery`] through a fixed sequence
//! of stages. Each stage looks at the request in [`ListingContext`] and either
//! returns the query unchanged or layers one more predicate, ordering term or
//! bound onto it. Every stage is a plain function so it can be exercised
//! without a database.

use std::str::FromStr;

use rusqlite::types::Value;
use rusqlite::{Connection, ToSql};
use tracing::debug;

use crate::albums::OwnershipIndex;
use crate::database::{fetch_all, queries};
use crate::error::{AppError, AppResult};
use crate::models::{Album, AlbumFilter, OrderDirection, Ordering, Pagination};

const FAVORITE: &str = "COALESCE(uad.favorite, 0)";

/// Album attributes a caller may order by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlbumSortField {
    Id,
    Title,
    Path,
    ParentAlbumId,
    CreatedAt,
    UpdatedAt,
}

impl AlbumSortField {
    pub fn column(self) -> &'static str {
        match self {
            AlbumSortField::Id => "a.id",
            AlbumSortField::Title => "a.title",
            AlbumSortField::Path => "a.path",
            AlbumSortField::ParentAlbumId => "a.parent_album_id",
            AlbumSortField::CreatedAt => "a.created_at",
            AlbumSortField::UpdatedAt => "a.updated_at",
        }
    }
}

impl FromStr for AlbumSortField {
    type Err = AppError;

    fn from_str(field: &str) -> AppResult<Self> {
        match field {
            "id" => Ok(AlbumSortField::Id),
            "title" => Ok(AlbumSortField::Title),
            "path" => Ok(AlbumSortField::Path),
            "parent_album_id" | "parentAlbumId" => Ok(AlbumSortField::ParentAlbumId),
            "created_at" | "createdAt" => Ok(AlbumSortField::CreatedAt),
            "updated_at" | "updatedAt" => Ok(AlbumSortField::UpdatedAt),
            other => Err(AppError::Validation(format!(
                "Albums cannot be ordered by '{}'",
                other
            ))),
        }
    }
}

/// Everything the stages may consult while composing a listing.
#[derive(Debug, Clone, Copy)]
pub struct ListingContext<'a> {
    pub ownership: &'a OwnershipIndex,
    pub filter: &'a AlbumFilter,
    pub ordering: Option<&'a Ordering>,
    pub pagination: Option<&'a Pagination>,
    pub max_page_size: i64,
}

/// A SELECT over `albums` joined with the user's favorite flags.
#[derive(Debug, Clone)]
pub struct AlbumQuery {
    user_id: i64,
    conditions: Vec<String>,
    params: Vec<Value>,
    order_by: Vec<String>,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl AlbumQuery {
    pub fn new(user_id: i64) -> Self {
        Self {
            user_id,
            conditions: Vec::new(),
            params: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    /// Adds a predicate ANDed with the others. Its placeholders bind `params`
    /// in order.
    pub fn filter<I>(mut self, condition: impl Into<String>, params: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        self.conditions.push(condition.into());
        self.params.extend(params);
        self
    }

    pub fn order(mut self, term: impl Into<String>) -> Self {
        self.order_by.push(term.into());
        self
    }

    pub fn bounds(mut self, limit: Option<i64>, offset: Option<i64>) -> Self {
        self.limit = limit;
        self.offset = offset;
        self
    }

    pub fn to_sql(&self) -> (String, Vec<Value>) {
        let mut sql = format!(
            "SELECT {} {}",
            queries::albums::COLUMNS.trim(),
            queries::albums::FROM_WITH_FAVORITE.trim()
        );
        let mut params = vec![Value::Integer(self.user_id)];

        if !self.conditions.is_empty() {
            let clauses: Vec<String> = self
                .conditions
                .iter()
                .map(|condition| format!("({})", condition))
                .collect();
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
            params.extend(self.params.iter().cloned());
        }

        if !self.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.order_by.join(", "));
        }

        match (self.limit, self.offset) {
            (Some(limit), offset) => {
                sql.push_str(" LIMIT ?");
                params.push(Value::Integer(limit));
                if let Some(offset) = offset {
                    sql.push_str(" OFFSET ?");
                    params.push(Value::Integer(offset));
                }
            }
            (None, Some(offset)) => {
                sql.push_str(" LIMIT -1 OFFSET ?");
                params.push(Value::Integer(offset));
            }
            (None, None) => {}
        }

        (sql, params)
    }
}

type Stage = fn(AlbumQuery, &ListingContext<'_>) -> AppResult<AlbumQuery>;

const STAGES: &[Stage] = &[
    restrict_to_owned,
    hide_empty,
    favorite_boost,
    only_root,
    caller_ordering,
    tie_break,
    paginate,
];

/// The owned set is expressed as a subquery on `user_albums` so the statement
/// binds one parameter however many albums the user owns.
fn owned_subquery(ctx: &ListingContext<'_>) -> (String, Value) {
    (
        format!("({})", queries::ownership::OWNED_ALBUM_IDS),
        Value::Integer(ctx.ownership.user_id()),
    )
}

pub fn restrict_to_owned(query: AlbumQuery, ctx: &ListingContext<'_>) -> AppResult<AlbumQuery> {
    let (owned, user_id) = owned_subquery(ctx);
    Ok(query.filter(format!("a.id IN {}", owned), [user_id]))
}

/// Drops albums without media unless `showEmpty` is set. With
/// `onlyWithFavorites` the album must hold media this user has favorited.
pub fn hide_empty(query: AlbumQuery, ctx: &ListingContext<'_>) -> AppResult<AlbumQuery> {
    if ctx.filter.show_empty == Some(true) {
        return Ok(query);
    }

    if ctx.filter.only_with_favorites == Some(true) {
        let condition = r#"EXISTS (
            SELECT 1
              FROM media AS m
             WHERE m.album_id = a.id
               AND EXISTS (
                   SELECT 1
                     FROM user_media_data AS umd
                    WHERE umd.media_id = m.id
                      AND umd.user_id = ?
                      AND umd.favorite = 1
               )
        )"#;
        return Ok(query.filter(condition, [Value::Integer(ctx.ownership.user_id())]));
    }

    Ok(query.filter(
        "EXISTS (SELECT 1 FROM media AS m WHERE m.album_id = a.id)",
        Vec::<Value>::new(),
    ))
}

pub fn favorite_boost(query: AlbumQuery, _ctx: &ListingContext<'_>) -> AppResult<AlbumQuery> {
    Ok(query.order(format!("{} DESC", FAVORITE)))
}

/// Restricts to the top of the user's view, plus anything favorited.
///
/// With a single parentless owned album (and more than one album owned) the
/// top is that album's children. Otherwise it is every owned album whose
/// parent is missing or outside the owned set.
pub fn only_root(query: AlbumQuery, ctx: &ListingContext<'_>) -> AppResult<AlbumQuery> {
    if ctx.filter.only_root != Some(true) {
        return Ok(query);
    }

    match ctx.ownership.single_root() {
        Some(root_id) if ctx.ownership.len() > 1 => {
            debug!(root_id, "Listing children of synthetic root");
            let condition = format!("a.parent_album_id = ? OR {} = 1", FAVORITE);
            Ok(query.filter(condition, [Value::Integer(root_id)]))
        }
        _ => {
            let (owned, user_id) = owned_subquery(ctx);
            let condition = format!(
                "a.parent_album_id IS NULL OR a.parent_album_id NOT IN {} OR {} = 1",
                owned, FAVORITE
            );
            Ok(query.filter(condition, [user_id]))
        }
    }
}

pub fn caller_ordering(query: AlbumQuery, ctx: &ListingContext<'_>) -> AppResult<AlbumQuery> {
    let Some(ordering) = ctx.ordering else {
        return Ok(query);
    };
    let Some(order_by) = ordering.order_by.as_deref() else {
        return Ok(query);
    };

    let field: AlbumSortField = order_by.parse()?;
    let direction = match ordering.order_direction.unwrap_or_default() {
        OrderDirection::Asc => "ASC",
        OrderDirection::Desc => "DESC",
    };

    Ok(query.order(format!("{} {}", field.column(), direction)))
}

pub fn tie_break(query: AlbumQuery, _ctx: &ListingContext<'_>) -> AppResult<AlbumQuery> {
    Ok(query.order("a.id ASC"))
}

pub fn paginate(query: AlbumQuery, ctx: &ListingContext<'_>) -> AppResult<AlbumQuery> {
    let Some(pagination) = ctx.pagination else {
        return Ok(query);
    };

    if pagination.limit.is_some_and(|limit| limit < 0) {
        return Err(AppError::Validation("limit must not be negative".to_string()));
    }
    if pagination.offset.is_some_and(|offset| offset < 0) {
        return Err(AppError::Validation("offset must not be negative".to_string()));
    }

    let limit = pagination.limit.map(|limit| {
        if limit > ctx.max_page_size {
            debug!(limit, max = ctx.max_page_size, "Clamping album page size");
        }
        limit.min(ctx.max_page_size)
    });

    Ok(query.bounds(limit, pagination.offset))
}

/// Runs every stage over a fresh query for the context's user.
pub fn build_album_query(ctx: &ListingContext<'_>) -> AppResult<AlbumQuery> {
    STAGES
        .iter()
        .try_fold(AlbumQuery::new(ctx.ownership.user_id()), |query, stage| {
            stage(query, ctx)
        })
}

pub fn list_albums(conn: &Connection, ctx: &ListingContext<'_>) -> AppResult<Vec<Album>> {
    if ctx.ownership.is_empty() {
        debug!(user_id = ctx.ownership.user_id(), "User owns no albums");
        return Ok(Vec::new());
    }

    let (sql, params) = build_album_query(ctx)?.to_sql();
    debug!(user_id = ctx.ownership.user_id(), %sql, "Listing albums");

    let param_refs: Vec<&dyn ToSql> = params.iter().map(|p| p as &dyn ToSql).collect();
    fetch_all(conn, &sql, &param_refs, Album::from_row)
}
