use axum::response::{IntoResponse, Response};
use fintrack_core::error::CoreError;
use validator::ValidationErrors;

use crate::response::{ApiResponse, ErrorDetail};

/// Application-level error type for extractors and other work that happens
/// before a service takes over.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] so rejections use the same envelope as
/// service responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `fintrack_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The request body failed field validation.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for extractor and handler results.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let envelope: ApiResponse<()> = match self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::Validation(msg) => ApiResponse::bad_request(Some(&msg)),
                CoreError::Unauthorized(msg) => ApiResponse::unauthorized(Some(&msg)),
                CoreError::Forbidden(msg) => ApiResponse::forbidden(Some(&msg)),
            },

            // --- HTTP-specific errors ---
            AppError::Validation(errors) => {
                ApiResponse::bad_request(Some("One or more validation errors occurred"))
                    .with_errors(field_errors(&errors))
            }
            AppError::BadRequest(msg) => ApiResponse::bad_request(Some(&msg)),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                ApiResponse::internal_server_error()
            }
        };

        envelope.into_response()
    }
}

/// Flatten `validator` output into one [`ErrorDetail`] per failed rule,
/// sorted by field name for stable responses.
fn field_errors(errors: &ValidationErrors) -> Vec<ErrorDetail> {
    let mut details: Vec<ErrorDetail> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, failures)| {
            failures.iter().map(move |failure| {
                let description = failure
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value ({})", failure.code));
                ErrorDetail::new(field.to_string(), description)
            })
        })
        .collect();
    details.sort_by(|a, b| a.code.cmp(&b.code));
    details
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use validator::Validate;

    use super::*;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "Name is required"))]
        name: String,
    }

    #[test]
    fn validation_errors_become_field_details() {
        let errors = Sample { name: String::new() }.validate().unwrap_err();
        let details = field_errors(&errors);
        assert_eq!(details, vec![ErrorDetail::new("name", "Name is required")]);
    }

    #[test]
    fn rejection_status_matches_envelope_code() {
        let err = AppError::Core(CoreError::Forbidden("nope".into()));
        assert_eq!(err.into_response().status(), StatusCode::FORBIDDEN);

        let err = AppError::Core(CoreError::Unauthorized("expired".into()));
        assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);

        let err = AppError::BadRequest("bad".into());
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
