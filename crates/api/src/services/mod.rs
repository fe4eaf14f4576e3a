//! Domain services.
//!
//! Each operation takes the shared [`AppState`](crate::state::AppState),
//! performs one request's worth of work, and returns exactly one
//! [`ApiResponse`]. Expected outcomes (missing rows, duplicates, writes that
//! did not land) are answered with their own envelope; anything unexpected
//! travels as a [`ServiceError`] to [`recover`], which logs it and answers
//! with the generic failure. No error leaves a service.

use fintrack_db::RepoError;

use crate::response::{ApiResponse, ErrorDetail};
use crate::storage::BlobError;

pub mod account;
pub mod auth;
pub mod blob;
pub mod goal;
pub mod image;
pub mod transaction;

/// Unexpected failures inside a service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Repo(#[from] RepoError),

    #[error(transparent)]
    Blob(#[from] BlobError),

    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Password hashing error: {0}")]
    Password(String),
}

impl From<argon2::password_hash::Error> for ServiceError {
    fn from(err: argon2::password_hash::Error) -> Self {
        ServiceError::Password(err.to_string())
    }
}

pub type ServiceResult<T> = Result<ApiResponse<T>, ServiceError>;

/// Turn a failed operation into its envelope.
///
/// Blob backend failures are a failed dependency (424); everything else is
/// the generic 500. Details go to the log only.
pub(crate) fn recover<T>(operation: &'static str, result: ServiceResult<T>) -> ApiResponse<T> {
    match result {
        Ok(response) => response,
        Err(ServiceError::Blob(err)) => {
            tracing::error!(operation, error = %err, "Blob storage failure");
            ApiResponse::failed_dependency(
                None,
                vec![ErrorDetail::new("Storage", "The blob store did not complete the request")],
            )
        }
        Err(err) => {
            tracing::error!(operation, error = %err, "Unhandled service error");
            ApiResponse::internal_server_error()
        }
    }
}

/// The 424 returned when a repository write affected nothing.
pub(crate) fn not_persisted<T>(entity: &str) -> ApiResponse<T> {
    ApiResponse::failed_dependency(
        None,
        vec![ErrorDetail::new(
            entity,
            format!("The {} could not be saved", entity.to_ascii_lowercase()),
        )],
    )
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn repo_errors_become_generic_500() {
        let result: ServiceResult<()> = Err(ServiceError::Repo(RepoError::Database(
            sqlx::Error::PoolTimedOut,
        )));
        let response = recover("test", result);
        assert_eq!(response.code, 500);
        assert!(response.errors.is_empty());
    }

    #[test]
    fn blob_errors_become_failed_dependency() {
        let result: ServiceResult<()> = Err(BlobError::Backend("down".into()).into());
        let response = recover("test", result);
        assert_eq!(response.code, 424);
        assert_eq!(response.errors[0].code, "Storage");
    }

    #[test]
    fn password_hash_errors_convert() {
        let err: ServiceError = argon2::password_hash::Error::Password.into();
        assert_matches!(err, ServiceError::Password(_));
    }

    #[test]
    fn successful_results_pass_through() {
        let response = recover("test", Ok(ApiResponse::created(7)));
        assert_eq!(response.code, 201);
        assert_eq!(response.data, Some(7));
    }
}
