use axum::{extract::State, routing::post, Json, Router};

use crate::albums::{self, ListingContext, OwnershipIndex};
use crate::auth::{AppState, CurrentUser};
use crate::database::get_connection;
use crate::error::AppResult;
use crate::models::{
    Album, AlbumGetRequest, AlbumListRequest, AlbumListResponse, AlbumPathRequest,
    AlbumPathResponse, AlbumResetCoverRequest, AlbumSetCoverRequest,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/album/list", post(list_albums))
        .route("/album/get", post(get_album))
        .route("/album/path", post(album_path))
        .route("/album/set-cover", post(set_album_cover))
        .route("/album/reset-cover", post(reset_album_cover))
}

async fn list_albums(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<AlbumListRequest>,
) -> AppResult<Json<AlbumListResponse>> {
    let conn = get_connection(&state.pool)?;
    let ownership = OwnershipIndex::load(&conn, current_user.id)?;

    let ctx = ListingContext {
        ownership: &ownership,
        filter: &request.filter,
        ordering: request.order.as_ref(),
        pagination: request.paginate.as_ref(),
        max_page_size: state.config.albums.max_page_size,
    };
    let albums = albums::list_albums(&conn, &ctx)?;

    Ok(Json(AlbumListResponse { albums }))
}

async fn get_album(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<AlbumGetRequest>,
) -> AppResult<Json<Album>> {
    let conn = get_connection(&state.pool)?;
    let ownership = OwnershipIndex::load(&conn, current_user.id)?;

    let album = albums::fetch_owned_album(&conn, &ownership, request.album_id)?;
    Ok(Json(album))
}

async fn album_path(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<AlbumPathRequest>,
) -> AppResult<Json<AlbumPathResponse>> {
    let conn = get_connection(&state.pool)?;
    let ownership = OwnershipIndex::load(&conn, current_user.id)?;

    let path = albums::album_path(
        &conn,
        &ownership,
        request.album_id,
        state.config.albums.max_ancestor_depth,
    )?;

    Ok(Json(AlbumPathResponse { path }))
}

async fn set_album_cover(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<AlbumSetCoverRequest>,
) -> AppResult<Json<Album>> {
    let mut conn = get_connection(&state.pool)?;
    let ownership = OwnershipIndex::load(&conn, current_user.id)?;

    let album = albums::set_album_cover(&mut conn, &ownership, request.media_id)?;
    Ok(Json(album))
}

async fn reset_album_cover(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<AlbumResetCoverRequest>,
) -> AppResult<Json<Album>> {
    let mut conn = get_connection(&state.pool)?;
    let ownership = OwnershipIndex::load(&conn, current_user.id)?;

    let album = albums::reset_album_cover(&mut conn, &ownership, request.album_id)?;
    Ok(Json(album))
}
