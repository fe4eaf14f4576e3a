//! Blob uploads, lookups and removal.
//!
//! Uploads are stored under a random key that keeps the original extension;
//! the paired image row is written only once the blob write has succeeded.

use std::path::Path;

use axum::body::Bytes;
use fintrack_core::size::readable_size;
use fintrack_core::types::Timestamp;
use fintrack_db::models::image::NewImage;
use serde::Serialize;
use uuid::Uuid;

use super::{recover, ServiceResult};
use crate::auth::antiforgery;
use crate::middleware::auth::AuthUser;
use crate::response::{ApiResponse, ErrorDetail};
use crate::state::AppState;
use crate::storage::BlobObject;

/// Blob metadata as returned to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlobResponse {
    pub file_name: String,
    pub original_file_name: String,
    pub content_type: String,
    pub url: String,
    pub size: u64,
    pub readable_size: String,
    pub created_at: Timestamp,
}

impl From<BlobObject> for BlobResponse {
    fn from(object: BlobObject) -> Self {
        Self {
            readable_size: readable_size(object.size),
            file_name: object.name,
            original_file_name: object.original_file_name,
            content_type: object.content_type,
            url: object.url,
            size: object.size,
            created_at: object.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AntiforgeryTokenResponse {
    pub request_token: String,
    pub header_name: &'static str,
}

/// One file taken from a multipart form.
#[derive(Debug)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
}

/// `.png` for `cat.PNG`, empty when the name has no extension.
fn extension_of(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
        .unwrap_or_default()
}

fn storage_key(extension: &str) -> String {
    format!("{}{extension}", Uuid::new_v4().simple())
}

pub fn antiforgery_token(state: &AppState) -> ApiResponse<AntiforgeryTokenResponse> {
    match antiforgery::issue_token(&state.config.jwt.secret) {
        Some(request_token) => ApiResponse::ok(AntiforgeryTokenResponse {
            request_token,
            header_name: antiforgery::HEADER_NAME,
        }),
        None => {
            tracing::error!("antiforgery token could not be signed");
            ApiResponse::internal_server_error()
        }
    }
}

pub async fn list(state: &AppState) -> ApiResponse<Vec<BlobResponse>> {
    recover("list_blobs", list_inner(state).await)
}

async fn list_inner(state: &AppState) -> ServiceResult<Vec<BlobResponse>> {
    let blobs = state.blobs.list().await?;
    Ok(ApiResponse::ok(
        blobs.into_iter().map(BlobResponse::from).collect(),
    ))
}

pub async fn get(state: &AppState, name: &str) -> ApiResponse<BlobResponse> {
    recover("get_blob", get_inner(state, name).await)
}

async fn get_inner(state: &AppState, name: &str) -> ServiceResult<BlobResponse> {
    Ok(match state.blobs.get(name).await? {
        Some(object) => ApiResponse::ok(object.into()),
        None => ApiResponse::not_found(Some("Blob not found")),
    })
}

pub async fn upload(
    state: &AppState,
    user: &AuthUser,
    file: UploadedFile,
) -> ApiResponse<BlobResponse> {
    recover("upload_blob", upload_inner(state, user, file).await)
}

async fn upload_inner(
    state: &AppState,
    user: &AuthUser,
    file: UploadedFile,
) -> ServiceResult<BlobResponse> {
    let extension = extension_of(&file.file_name);
    let key = storage_key(&extension);
    tracing::info!(
        user_id = %user.user_id,
        original_file_name = %file.file_name,
        key = %key,
        bytes = file.data.len(),
        "Uploading blob"
    );

    let object = state
        .blobs
        .put(&key, file.data, &file.content_type, &file.file_name)
        .await?;

    let new_image = NewImage {
        user_id: user.user_id.clone(),
        image_url: object.url.clone(),
        file_path: state.blobs.path_for(&key),
        file_name: key.clone(),
        original_file_name: object.original_file_name.clone(),
        file_extension: extension,
        size: i64::try_from(object.size).unwrap_or(i64::MAX),
        readable_size: readable_size(object.size),
        created_by: user.user_name.clone(),
    };

    // The blob stays even when its row cannot be written.
    match state.repos.images.create(&new_image).await {
        Ok(Some(image)) => {
            tracing::info!(image_id = %image.id, key = %key, "Image row recorded");
        }
        Ok(None) => {
            tracing::error!(key = %key, "Blob stored but image row was not written");
        }
        Err(e) => {
            tracing::error!(key = %key, error = %e, "Blob stored but image row insert failed");
        }
    }

    Ok(ApiResponse::ok(object.into()))
}

/// Removes the blob, then its image row if there is one. Answers 202.
pub async fn delete(state: &AppState, user: &AuthUser, name: &str) -> ApiResponse<String> {
    recover("delete_blob", delete_inner(state, user, name).await)
}

async fn delete_inner(state: &AppState, user: &AuthUser, name: &str) -> ServiceResult<String> {
    tracing::info!(user_id = %user.user_id, key = name, "Deleting blob");

    if !state.blobs.delete_if_exists(name).await? {
        tracing::warn!(key = name, "Blob delete removed nothing");
        return Ok(ApiResponse::failed_dependency(
            Some("The blob could not be deleted"),
            vec![ErrorDetail::new("Blob", format!("No blob named '{name}' was removed"))],
        ));
    }

    if let Some(image) = state.repos.images.find_by_file_name(name).await? {
        if !state.repos.images.delete(&image.id).await? {
            tracing::warn!(image_id = %image.id, key = name, "Image row for deleted blob was not removed");
        }
    }

    Ok(ApiResponse::accepted(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_lowercased_with_dot() {
        assert_eq!(extension_of("Holiday.PNG"), ".png");
        assert_eq!(extension_of("archive.tar.gz"), ".gz");
        assert_eq!(extension_of("README"), "");
    }

    #[test]
    fn keys_are_unique_and_keep_extension() {
        let a = storage_key(".jpg");
        let b = storage_key(".jpg");
        assert_ne!(a, b);
        assert!(a.ends_with(".jpg"));
        assert_eq!(a.len(), 32 + 4);
    }
}
