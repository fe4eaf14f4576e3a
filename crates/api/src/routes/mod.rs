pub mod account;
pub mod auth;
pub mod blob;
pub mod goal;
pub mod health;
pub mod image;
pub mod transaction;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /api/auth/register                       register (public)
/// /api/auth/login                          login (public)
/// /api/auth/refresh-token                  rotate tokens (public, PATCH)
///
/// /api/account                             create, list (admin)
/// /api/account/{id}                        get, update, delete
///
/// /api/goal                                create, list (admin)
/// /api/goal/{id}                           get, update, delete
///
/// /api/transaction                         create, list (admin)
/// /api/transaction/{id}                    get, update (admin), delete (admin)
///
/// /api/images                              list
/// /api/images/{id}                         get, delete
///
/// /api/blobs                               list, upload (multipart)
/// /api/blobs/get-anti-forgery-token        issue upload token (public)
/// /api/blobs/{blobName}                    get, delete
/// ```
///
/// Every path is a constant in [`crate::links::paths`], which the link
/// builder also resolves hrefs against.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(account::router())
        .merge(goal::router())
        .merge(transaction::router())
        .merge(image::router())
        .merge(blob::router())
}
