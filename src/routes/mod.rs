mod albums;

use axum::Router;
use crate::auth::AppState;

pub fn api_router() -> Router<AppState> {
    Router::new().merge(albums::router())
}
