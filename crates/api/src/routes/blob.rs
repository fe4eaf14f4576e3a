//! Route definitions for the `/api/blobs` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::blob;
use crate::links::paths;
use crate::state::AppState;

/// ```text
/// GET    /api/blobs                          -> list
/// POST   /api/blobs                          -> upload
/// GET    /api/blobs/get-anti-forgery-token   -> antiforgery_token (public)
/// GET    /api/blobs/{blobName}               -> get_by_name
/// DELETE /api/blobs/{blobName}               -> delete
/// ```
///
/// The static token path takes precedence over the `{blobName}` capture.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(paths::BLOBS, get(blob::list).post(blob::upload))
        .route(paths::ANTIFORGERY_TOKEN, get(blob::antiforgery_token))
        .route(paths::BLOB, get(blob::get_by_name).delete(blob::delete))
}
