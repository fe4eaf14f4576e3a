//! Route definitions for the `/api/goal` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::goal;
use crate::links::paths;
use crate::state::AppState;

/// ```text
/// POST   /api/goal        -> create
/// GET    /api/goal        -> list (admin)
/// GET    /api/goal/{id}   -> get_by_id
/// PUT    /api/goal/{id}   -> update
/// DELETE /api/goal/{id}   -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(paths::GOALS, get(goal::list).post(goal::create))
        .route(
            paths::GOAL,
            get(goal::get_by_id).put(goal::update).delete(goal::delete),
        )
}
