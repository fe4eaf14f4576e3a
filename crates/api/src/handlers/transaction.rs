//! Handlers for the `/api/transaction` resource.

use axum::extract::{Path, State};
use fintrack_core::pagination::PagedList;
use fintrack_db::models::transaction::Transaction;

use crate::middleware::rbac::{RequireAuth, RequireBulkAccess, RequireRoles};
use crate::middleware::validation::{ListQuery, ValidatedJson};
use crate::query::TransactionListParams;
use crate::response::{ApiResponse, Resource};
use crate::services::transaction::{self, CreateTransactionRequest, UpdateTransactionRequest};
use crate::state::AppState;

/// POST /api/transaction
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ValidatedJson(input): ValidatedJson<CreateTransactionRequest>,
) -> ApiResponse<Resource<Transaction>> {
    transaction::create(&state, &user, input).await
}

/// PUT /api/transaction/{id} (administrators only)
pub async fn update(
    State(state): State<AppState>,
    RequireRoles(user, _): RequireBulkAccess,
    Path(id): Path<String>,
    ValidatedJson(input): ValidatedJson<UpdateTransactionRequest>,
) -> ApiResponse<Resource<Transaction>> {
    transaction::update(&state, &user, &id, input).await
}

/// GET /api/transaction/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<String>,
) -> ApiResponse<Resource<Transaction>> {
    transaction::get(&state, &id).await
}

/// DELETE /api/transaction/{id} (administrators only)
pub async fn delete(
    State(state): State<AppState>,
    RequireRoles(user, _): RequireBulkAccess,
    Path(id): Path<String>,
) -> ApiResponse<Transaction> {
    transaction::delete(&state, &user, &id).await
}

/// GET /api/transaction (administrators only)
pub async fn list(
    State(state): State<AppState>,
    RequireRoles(_user, _): RequireBulkAccess,
    ListQuery(params): ListQuery<TransactionListParams>,
) -> ApiResponse<PagedList<Resource<Transaction>>> {
    transaction::list(&state, &params).await
}
