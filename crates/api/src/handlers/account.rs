//! Handlers for the `/api/account` resource.

use axum::extract::{Path, State};
use fintrack_core::pagination::PagedList;
use fintrack_db::models::account::Account;

use crate::middleware::rbac::{RequireAuth, RequireBulkAccess, RequireRoles};
use crate::middleware::validation::{ListQuery, ValidatedJson};
use crate::query::AccountListParams;
use crate::response::{ApiResponse, Resource};
use crate::services::account::{self, CreateAccountRequest, UpdateAccountRequest};
use crate::state::AppState;

/// POST /api/account
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ValidatedJson(input): ValidatedJson<CreateAccountRequest>,
) -> ApiResponse<Resource<Account>> {
    account::create(&state, &user, input).await
}

/// PUT /api/account/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
    ValidatedJson(input): ValidatedJson<UpdateAccountRequest>,
) -> ApiResponse<Resource<Account>> {
    account::update(&state, &user, &id, input).await
}

/// GET /api/account/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<String>,
) -> ApiResponse<Resource<Account>> {
    account::get(&state, &id).await
}

/// DELETE /api/account/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> ApiResponse<Account> {
    account::delete(&state, &user, &id).await
}

/// GET /api/account (administrators only)
pub async fn list(
    State(state): State<AppState>,
    RequireRoles(_user, _): RequireBulkAccess,
    ListQuery(params): ListQuery<AccountListParams>,
) -> ApiResponse<PagedList<Resource<Account>>> {
    account::list(&state, &params).await
}
