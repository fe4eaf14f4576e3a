//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use fintrack_core::error::CoreError;
use fintrack_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a JWT Bearer token in the `Authorization` header.
///
/// Besides the signature and expiry checks, the token's security stamp must
/// still match the stored user's, so revoking a user's tokens takes effect
/// immediately.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> ApiResponse<()> {
///     tracing::info!(user_id = %user.user_id, "handling request");
///     ApiResponse::ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's id (from `claims.sub`).
    pub user_id: DbId,
    pub email: String,
    /// Recorded as `createdBy` / `updatedBy` on everything this user writes.
    pub user_name: String,
    pub roles: Vec<String>,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        let user = state
            .repos
            .users
            .find_by_id(&claims.sub)
            .await
            .map_err(|e| AppError::InternalError(format!("Failed to load user: {e}")))?
            .filter(|user| user.security_stamp == claims.stamp)
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("Token has been revoked".into()))
            })?;

        Ok(AuthUser {
            user_id: user.id,
            email: user.email,
            user_name: user.user_name,
            roles: claims.roles,
        })
    }
}
