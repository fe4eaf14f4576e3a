//! Handlers for the `/api/goal` resource.

use axum::extract::{Path, State};
use fintrack_core::pagination::PagedList;
use fintrack_db::models::goal::Goal;

use crate::middleware::rbac::{RequireAuth, RequireBulkAccess, RequireRoles};
use crate::middleware::validation::{ListQuery, ValidatedJson};
use crate::query::GoalListParams;
use crate::response::{ApiResponse, Resource};
use crate::services::goal::{self, CreateGoalRequest, UpdateGoalRequest};
use crate::state::AppState;

/// POST /api/goal
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ValidatedJson(input): ValidatedJson<CreateGoalRequest>,
) -> ApiResponse<Resource<Goal>> {
    goal::create(&state, &user, input).await
}

/// PUT /api/goal/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
    ValidatedJson(input): ValidatedJson<UpdateGoalRequest>,
) -> ApiResponse<Resource<Goal>> {
    goal::update(&state, &user, &id, input).await
}

/// GET /api/goal/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<String>,
) -> ApiResponse<Resource<Goal>> {
    goal::get(&state, &id).await
}

/// DELETE /api/goal/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> ApiResponse<Goal> {
    goal::delete(&state, &user, &id).await
}

/// GET /api/goal (administrators only)
pub async fn list(
    State(state): State<AppState>,
    RequireRoles(_user, _): RequireBulkAccess,
    ListQuery(params): ListQuery<GoalListParams>,
) -> ApiResponse<PagedList<Resource<Goal>>> {
    goal::list(&state, &params).await
}
