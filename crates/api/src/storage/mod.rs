//! Blob storage behind a trait, with an S3 backend and an in-process one.
//!
//! Every stored object carries its content type and the client's original
//! file name as metadata, so listing and lookups can rebuild a
//! [`BlobObject`] without consulting the database.

use async_trait::async_trait;
use axum::body::Bytes;
use fintrack_core::types::Timestamp;

pub mod memory;
pub mod s3;

pub use memory::MemoryBlobStore;
pub use s3::S3BlobStore;

#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    #[error("Blob backend error: {0}")]
    Backend(String),
}

/// Metadata of one stored object.
#[derive(Debug, Clone, PartialEq)]
pub struct BlobObject {
    /// Storage key.
    pub name: String,
    pub content_type: String,
    pub original_file_name: String,
    /// Length in bytes.
    pub size: u64,
    pub created_at: Timestamp,
    pub url: String,
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Write (or overwrite) an object.
    async fn put(
        &self,
        name: &str,
        data: Bytes,
        content_type: &str,
        original_file_name: &str,
    ) -> Result<BlobObject, BlobError>;

    /// Metadata for one object, `None` when the key does not exist.
    async fn get(&self, name: &str) -> Result<Option<BlobObject>, BlobError>;

    async fn list(&self) -> Result<Vec<BlobObject>, BlobError>;

    /// Remove an object. `false` when there was nothing to remove.
    async fn delete_if_exists(&self, name: &str) -> Result<bool, BlobError>;

    /// Public URL of `name`.
    fn url_for(&self, name: &str) -> String;

    /// Location of `name` inside the backend (`bucket/key` for S3).
    fn path_for(&self, name: &str) -> String;

    /// Short backend label for logs and the health endpoint.
    fn backend_name(&self) -> &'static str;
}

fn join_url(base: &str, name: &str) -> String {
    format!("{}/{name}", base.trim_end_matches('/'))
}
