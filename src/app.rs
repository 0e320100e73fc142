use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::auth::AppState;
use crate::config::Config;
use crate::database::DbPool;
use crate::logging::request_logger;
use crate::routes::api_router;
use crate::VERSION;

#[derive(Serialize)]
struct HealthcheckResponse {
    status: String,
    version: String,
}

async fn healthcheck() -> Json<HealthcheckResponse> {
    Json(HealthcheckResponse {
        status: "healthy".to_string(),
        version: VERSION.to_string(),
    })
}

pub fn create_app(config: Arc<Config>, pool: DbPool) -> Router {
    let state = AppState { config, pool };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/healthcheck", get(healthcheck))
        .merge(api_router());

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(middleware::from_fn(request_logger))
        .layer(cors)
        .with_state(state)
}
