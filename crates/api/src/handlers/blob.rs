//! Handlers for the `/api/blobs` resource.

use axum::extract::{Multipart, Path, State};
use axum::http::HeaderMap;
use fintrack_core::error::CoreError;

use crate::auth::antiforgery;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::response::ApiResponse;
use crate::services::blob::{self, AntiforgeryTokenResponse, BlobResponse, UploadedFile};
use crate::state::AppState;

/// Multipart field that carries the upload.
const FILE_FIELD: &str = "file";

/// GET /api/blobs/get-anti-forgery-token (anonymous)
pub async fn antiforgery_token(
    State(state): State<AppState>,
) -> ApiResponse<AntiforgeryTokenResponse> {
    blob::antiforgery_token(&state)
}

/// GET /api/blobs
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> ApiResponse<Vec<BlobResponse>> {
    blob::list(&state).await
}

/// GET /api/blobs/{blobName}
pub async fn get_by_name(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(blob_name): Path<String>,
) -> ApiResponse<BlobResponse> {
    blob::get(&state, &blob_name).await
}

/// POST /api/blobs
///
/// Multipart upload with a single `file` field. The request must carry a
/// token from the anti-forgery endpoint in the `X-XSRF-TOKEN` header.
pub async fn upload(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> AppResult<ApiResponse<BlobResponse>> {
    let token = headers
        .get(antiforgery::HEADER_NAME)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if !antiforgery::verify_token(&state.config.jwt.secret, token) {
        return Err(AppError::Core(CoreError::Validation(
            "Missing or invalid anti-forgery token".into(),
        )));
    }

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read uploaded file: {e}")))?;
        upload = Some(UploadedFile {
            file_name,
            content_type,
            data,
        });
        break;
    }

    let file = upload.ok_or_else(|| {
        AppError::BadRequest(format!("A multipart field named '{FILE_FIELD}' is required"))
    })?;
    if file.data.is_empty() {
        return Err(AppError::BadRequest("The uploaded file is empty".into()));
    }

    Ok(blob::upload(&state, &user, file).await)
}

/// DELETE /api/blobs/{blobName}
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(blob_name): Path<String>,
) -> ApiResponse<String> {
    blob::delete(&state, &user, &blob_name).await
}
