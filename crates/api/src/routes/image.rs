//! Route definitions for the `/api/images` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::image;
use crate::links::paths;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(paths::IMAGES, get(image::list))
        .route(paths::IMAGE, get(image::get_by_id).delete(image::delete))
}
