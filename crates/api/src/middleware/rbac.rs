//! Role-based access control (RBAC) extractors.
//!
//! Each route that is gated names a [`RoleSet`]; the extractor wraps
//! [`AuthUser`] and rejects requests whose token carries none of the set's
//! roles. Authorization is therefore decided before the handler runs.

use std::marker::PhantomData;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use fintrack_core::error::CoreError;
use fintrack_core::roles::{has_any_role, BULK_ACCESS_ROLES};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// A named set of roles that may call a route.
pub trait RoleSet: Send + Sync {
    const ROLES: &'static [&'static str];
}

/// Roles allowed to list every record and to run privileged writes.
pub struct BulkAccess;

impl RoleSet for BulkAccess {
    const ROLES: &'static [&'static str] = BULK_ACCESS_ROLES;
}

/// Requires at least one role of `R`. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn list(RequireRoles(user, _): RequireBulkAccess) -> ApiResponse<()> {
///     ApiResponse::ok(())
/// }
/// ```
pub struct RequireRoles<R: RoleSet>(pub AuthUser, pub PhantomData<R>);

/// Requires `Administrator` or `Super Administrator`.
pub type RequireBulkAccess = RequireRoles<BulkAccess>;

impl<R: RoleSet> FromRequestParts<AppState> for RequireRoles<R> {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !has_any_role(&user.roles, R::ROLES) {
            tracing::warn!(user_id = %user.user_id, required = ?R::ROLES, "Role check failed");
            return Err(AppError::Core(CoreError::Forbidden(format!(
                "One of the following roles is required: {}",
                R::ROLES.join(", ")
            ))));
        }
        Ok(RequireRoles(user, PhantomData))
    }
}

/// Requires any authenticated user (any valid role).
///
/// Functionally equivalent to [`AuthUser`] but named explicitly for use in
/// handlers where the intent "this route requires authentication" should be
/// self-documenting.
pub struct RequireAuth(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        Ok(RequireAuth(user))
    }
}
