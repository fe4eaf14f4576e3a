//! Route definitions for the `/api/account` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::account;
use crate::links::paths;
use crate::state::AppState;

/// ```text
/// POST   /api/account        -> create
/// GET    /api/account        -> list (admin)
/// GET    /api/account/{id}   -> get_by_id
/// PUT    /api/account/{id}   -> update
/// DELETE /api/account/{id}   -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(paths::ACCOUNTS, get(account::list).post(account::create))
        .route(
            paths::ACCOUNT,
            get(account::get_by_id)
                .put(account::update)
                .delete(account::delete),
        )
}
