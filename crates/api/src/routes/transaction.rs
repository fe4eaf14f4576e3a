//! Route definitions for the `/api/transaction` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::transaction;
use crate::links::paths;
use crate::state::AppState;

/// ```text
/// POST   /api/transaction        -> create
/// GET    /api/transaction        -> list (admin)
/// GET    /api/transaction/{id}   -> get_by_id
/// PUT    /api/transaction/{id}   -> update (admin)
/// DELETE /api/transaction/{id}   -> delete (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            paths::TRANSACTIONS,
            get(transaction::list).post(transaction::create),
        )
        .route(
            paths::TRANSACTION,
            get(transaction::get_by_id)
                .put(transaction::update)
                .delete(transaction::delete),
        )
}
