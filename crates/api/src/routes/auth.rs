//! Route definitions for the `/api/auth` resource.

use axum::routing::{patch, post};
use axum::Router;

use crate::handlers::auth;
use crate::links::paths;
use crate::state::AppState;

/// ```text
/// POST  /api/auth/register        -> register
/// POST  /api/auth/login           -> login
/// PATCH /api/auth/refresh-token   -> refresh_token
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(paths::REGISTER, post(auth::register))
        .route(paths::LOGIN, post(auth::login))
        .route(paths::REFRESH_TOKEN, patch(auth::refresh_token))
}
