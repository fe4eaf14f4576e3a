use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::links::paths;
use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// `postgres` or `memory`.
    pub store: &'static str,
    /// Blob backend label.
    pub blob_store: &'static str,
    /// Whether the database is reachable (always true for the memory store).
    pub db_healthy: bool,
}

/// GET /health -- returns service and storage health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let (store, db_healthy) = match &state.pool {
        Some(pool) => ("postgres", fintrack_db::health_check(pool).await.is_ok()),
        None => ("memory", true),
    };

    let status = if db_healthy { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        store,
        blob_store: state.blobs.backend_name(),
        db_healthy,
    })
}

/// Mount health check routes (anonymous, outside `/api`).
pub fn router() -> Router<AppState> {
    Router::new().route(paths::HEALTH, get(health_check))
}
