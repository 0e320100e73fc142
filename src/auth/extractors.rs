use crate::auth::jwt::decode_access_token;
use crate::config::Config;
use crate::database::{fetch_one, get_connection, queries, DbPool};
use crate::error::AppError;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub pool: DbPool,
}

/// Credentials are only read from the `Authorization` header.
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let token = bearer_token(parts)
            .ok_or_else(|| AppError::Authentication("Not authenticated".to_string()))?;

        let claims = decode_access_token(token, &app_state.config)
            .ok_or_else(|| AppError::Authentication("Invalid or expired token".to_string()))?;

        let user_id: i64 = claims
            .sub
            .parse()
            .map_err(|_| AppError::Authentication("Invalid token".to_string()))?;

        let conn = get_connection(&app_state.pool)?;

        let (id, username, is_active) = fetch_one(
            &conn,
            queries::auth::SELECT_USER_FOR_TOKEN,
            &[&user_id],
            |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?, row.get::<_, bool>(2)?)),
        )?
        .ok_or_else(|| AppError::Authentication("User not found".to_string()))?;

        if !is_active {
            return Err(AppError::Authentication("User is inactive".to_string()));
        }

        Ok(CurrentUser { id, username })
    }
}
