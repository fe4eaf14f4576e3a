//! In-process blob store for development runs and tests. Only object
//! metadata is kept; content bytes are counted and dropped.

use std::collections::HashMap;

use async_trait::async_trait;
use axum::body::Bytes;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{join_url, BlobError, BlobObject, BlobStore};

pub struct MemoryBlobStore {
    base_url: String,
    objects: RwLock<HashMap<String, BlobObject>>,
}

impl MemoryBlobStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            objects: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(
        &self,
        name: &str,
        data: Bytes,
        content_type: &str,
        original_file_name: &str,
    ) -> Result<BlobObject, BlobError> {
        let object = BlobObject {
            name: name.to_string(),
            content_type: content_type.to_string(),
            original_file_name: original_file_name.to_string(),
            size: data.len() as u64,
            created_at: Utc::now(),
            url: self.url_for(name),
        };
        self.objects
            .write()
            .await
            .insert(name.to_string(), object.clone());
        Ok(object)
    }

    async fn get(&self, name: &str) -> Result<Option<BlobObject>, BlobError> {
        Ok(self.objects.read().await.get(name).cloned())
    }

    async fn list(&self) -> Result<Vec<BlobObject>, BlobError> {
        let mut objects: Vec<BlobObject> = self
            .objects
            .read()
            .await
            .values()
            .cloned()
            .collect();
        objects.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(objects)
    }

    async fn delete_if_exists(&self, name: &str) -> Result<bool, BlobError> {
        Ok(self.objects.write().await.remove(name).is_some())
    }

    fn url_for(&self, name: &str) -> String {
        join_url(&self.base_url, name)
    }

    fn path_for(&self, name: &str) -> String {
        format!("memory/{name}")
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
