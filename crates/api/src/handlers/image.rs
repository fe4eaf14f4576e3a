//! Handlers for the `/api/images` resource.

use axum::extract::{Path, State};
use fintrack_core::pagination::PagedList;
use fintrack_db::models::image::Image;

use crate::middleware::rbac::RequireAuth;
use crate::middleware::validation::ListQuery;
use crate::query::ImageListParams;
use crate::response::{ApiResponse, Resource};
use crate::services::image;
use crate::state::AppState;

/// GET /api/images
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    ListQuery(params): ListQuery<ImageListParams>,
) -> ApiResponse<PagedList<Resource<Image>>> {
    image::list(&state, &params).await
}

/// GET /api/images/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<String>,
) -> ApiResponse<Resource<Image>> {
    image::get(&state, &id).await
}

/// DELETE /api/images/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> ApiResponse<Image> {
    image::delete(&state, &user, &id).await
}
