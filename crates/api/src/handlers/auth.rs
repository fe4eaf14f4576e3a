//! Handlers for the `/api/auth` resource. All anonymous.

use axum::extract::State;

use crate::middleware::validation::ValidatedJson;
use crate::response::ApiResponse;
use crate::services::auth::{self, AuthResponse, LoginRequest, RefreshRequest, RegisterRequest};
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<RegisterRequest>,
) -> ApiResponse<AuthResponse> {
    auth::register(&state, input).await
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> ApiResponse<AuthResponse> {
    auth::login(&state, input).await
}

/// PATCH /api/auth/refresh-token
pub async fn refresh_token(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<RefreshRequest>,
) -> ApiResponse<AuthResponse> {
    auth::refresh(&state, input).await
}
