//! S3-backed blob store.

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use axum::body::Bytes;
use chrono::{DateTime, Utc};

use super::{join_url, BlobError, BlobObject, BlobStore};

/// Metadata key holding the client's original file name.
const ORIGINAL_NAME_KEY: &str = "original-file-name";

pub struct S3BlobStore {
    client: S3Client,
    bucket: String,
    base_url: String,
}

impl S3BlobStore {
    pub fn new(client: S3Client, bucket: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            base_url: base_url.into(),
        }
    }

    /// Build a client from the standard AWS environment (credentials chain,
    /// `AWS_REGION`, optional `AWS_ENDPOINT_URL`).
    pub async fn from_env(bucket: impl Into<String>, base_url: impl Into<String>) -> Self {
        let sdk_config = aws_config::load_from_env().await;
        Self::new(S3Client::new(&sdk_config), bucket, base_url)
    }

    async fn head(&self, name: &str) -> Result<Option<BlobObject>, BlobError> {
        let result = self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(name)
            .send()
            .await;

        let output = match result {
            Ok(output) => output,
            Err(err) => {
                if err
                    .as_service_error()
                    .is_some_and(|service| service.is_not_found())
                {
                    return Ok(None);
                }
                tracing::error!(bucket = %self.bucket, key = name, error = %err, "S3 head_object failed");
                return Err(BlobError::Backend(format!("S3 head failed: {err}")));
            }
        };

        let original_file_name = output
            .metadata()
            .and_then(|meta| meta.get(ORIGINAL_NAME_KEY))
            .cloned()
            .unwrap_or_else(|| name.to_string());
        let created_at = output
            .last_modified()
            .and_then(|t| DateTime::from_timestamp(t.secs(), t.subsec_nanos()))
            .unwrap_or_else(Utc::now);

        Ok(Some(BlobObject {
            name: name.to_string(),
            content_type: output
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string(),
            original_file_name,
            size: output.content_length().unwrap_or(0).max(0) as u64,
            created_at,
            url: self.url_for(name),
        }))
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn put(
        &self,
        name: &str,
        data: Bytes,
        content_type: &str,
        original_file_name: &str,
    ) -> Result<BlobObject, BlobError> {
        let size = data.len() as u64;
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(name)
            .content_type(content_type)
            .metadata(ORIGINAL_NAME_KEY, original_file_name)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(bucket = %self.bucket, key = name, error = %e, "S3 put_object failed");
                BlobError::Backend(format!("S3 put failed: {e}"))
            })?;

        Ok(BlobObject {
            name: name.to_string(),
            content_type: content_type.to_string(),
            original_file_name: original_file_name.to_string(),
            size,
            created_at: Utc::now(),
            url: self.url_for(name),
        })
    }

    async fn get(&self, name: &str) -> Result<Option<BlobObject>, BlobError> {
        self.head(name).await
    }

    async fn list(&self) -> Result<Vec<BlobObject>, BlobError> {
        let mut objects = Vec::new();
        let mut continuation: Option<String> = None;
        loop {
            let mut req = self.client.list_objects_v2().bucket(&self.bucket);
            if let Some(token) = continuation.as_ref() {
                req = req.continuation_token(token);
            }
            let resp = req.send().await.map_err(|e| {
                tracing::error!(bucket = %self.bucket, error = %e, "S3 list_objects_v2 failed");
                BlobError::Backend(format!("S3 list failed: {e}"))
            })?;

            for key in resp.contents().iter().filter_map(|o| o.key()) {
                // Objects removed between list and head are skipped.
                if let Some(object) = self.head(key).await? {
                    objects.push(object);
                }
            }

            if resp.is_truncated().unwrap_or(false) {
                continuation = resp.next_continuation_token().map(|s| s.to_string());
            } else {
                break;
            }
        }
        Ok(objects)
    }

    async fn delete_if_exists(&self, name: &str) -> Result<bool, BlobError> {
        if self.head(name).await?.is_none() {
            return Ok(false);
        }
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(name)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(bucket = %self.bucket, key = name, error = %e, "S3 delete_object failed");
                BlobError::Backend(format!("S3 delete failed: {e}"))
            })?;
        Ok(true)
    }

    fn url_for(&self, name: &str) -> String {
        join_url(&self.base_url, name)
    }

    fn path_for(&self, name: &str) -> String {
        format!("{}/{name}", self.bucket)
    }

    fn backend_name(&self) -> &'static str {
        "s3"
    }
}
