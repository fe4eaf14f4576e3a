use std::sync::Arc;

use fintrack_db::repositories::Repositories;
use fintrack_db::DbPool;

use crate::config::ServerConfig;
use crate::links::LinkBuilder;
use crate::storage::BlobStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration (JWT settings, base URLs).
    pub config: Arc<ServerConfig>,
    /// Database pool, `None` when running on the in-memory store.
    pub pool: Option<DbPool>,
    /// Repositories for every entity.
    pub repos: Repositories,
    /// Image/blob object storage.
    pub blobs: Arc<dyn BlobStore>,
    /// HATEOAS href builder rooted at the public base URL.
    pub links: Arc<LinkBuilder>,
}

impl AppState {
    pub fn new(
        config: ServerConfig,
        pool: Option<DbPool>,
        repos: Repositories,
        blobs: Arc<dyn BlobStore>,
    ) -> Self {
        let links = Arc::new(LinkBuilder::new(&config.public_base_url));
        Self {
            config: Arc::new(config),
            pool,
            repos,
            blobs,
            links,
        }
    }
}
