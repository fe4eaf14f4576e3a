//! The response envelope every endpoint returns.
//!
//! All API responses use `{ "code", "message", "data", "errors" }`. The HTTP
//! status always equals `code`. Services build these through the named
//! factories below rather than by hand so codes and default messages stay
//! consistent.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use fintrack_core::link::Link;
use serde::Serialize;

pub const MSG_OK: &str = "Request completed successfully";
pub const MSG_CREATED: &str = "Resource created successfully";
pub const MSG_ACCEPTED: &str = "Request accepted";
pub const MSG_BAD_REQUEST: &str = "The request is invalid";
pub const MSG_UNAUTHORIZED: &str = "Unauthorized";
pub const MSG_FORBIDDEN: &str = "You do not have permission to perform this action";
pub const MSG_NOT_FOUND: &str = "Resource not found";
pub const MSG_FAILED_DEPENDENCY: &str =
    "A downstream dependency failed to complete the request. Please try again";
pub const MSG_INTERNAL: &str = "Something went wrong on our side. Please try again later";

/// One entry of the `errors` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub description: String,
}

impl ErrorDetail {
    pub fn new(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
        }
    }
}

/// Standard response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub code: u16,
    pub message: String,
    pub data: Option<T>,
    pub errors: Vec<ErrorDetail>,
}

impl<T> ApiResponse<T> {
    fn with(status: StatusCode, message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            code: status.as_u16(),
            message: message.into(),
            data,
            errors: Vec::new(),
        }
    }

    pub fn ok(data: T) -> Self {
        Self::with(StatusCode::OK, MSG_OK, Some(data))
    }

    pub fn created(data: T) -> Self {
        Self::with(StatusCode::CREATED, MSG_CREATED, Some(data))
    }

    pub fn accepted(data: T) -> Self {
        Self::with(StatusCode::ACCEPTED, MSG_ACCEPTED, Some(data))
    }

    pub fn bad_request(message: Option<&str>) -> Self {
        Self::with(
            StatusCode::BAD_REQUEST,
            message.unwrap_or(MSG_BAD_REQUEST),
            None,
        )
    }

    pub fn unauthorized(message: Option<&str>) -> Self {
        Self::with(
            StatusCode::UNAUTHORIZED,
            message.unwrap_or(MSG_UNAUTHORIZED),
            None,
        )
    }

    pub fn forbidden(message: Option<&str>) -> Self {
        Self::with(StatusCode::FORBIDDEN, message.unwrap_or(MSG_FORBIDDEN), None)
    }

    pub fn not_found(message: Option<&str>) -> Self {
        Self::with(StatusCode::NOT_FOUND, message.unwrap_or(MSG_NOT_FOUND), None)
    }

    pub fn failed_dependency(message: Option<&str>, errors: Vec<ErrorDetail>) -> Self {
        let mut response = Self::with(
            StatusCode::FAILED_DEPENDENCY,
            message.unwrap_or(MSG_FAILED_DEPENDENCY),
            None,
        );
        response.errors = errors;
        response
    }

    /// The generic 500. Details belong in the log, never in the body.
    pub fn internal_server_error() -> Self {
        Self::with(StatusCode::INTERNAL_SERVER_ERROR, MSG_INTERNAL, None)
    }

    pub fn with_errors(mut self, errors: Vec<ErrorDetail>) -> Self {
        self.errors = errors;
        self
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

/// A single resource with its hypermedia controls inlined next to its fields.
#[derive(Debug, Serialize)]
pub struct Resource<T> {
    #[serde(flatten)]
    pub item: T,
    pub links: Vec<Link>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factories_set_matching_codes() {
        assert_eq!(ApiResponse::ok(1).code, 200);
        assert_eq!(ApiResponse::created(1).code, 201);
        assert_eq!(ApiResponse::accepted(1).code, 202);
        assert_eq!(ApiResponse::<()>::bad_request(None).code, 400);
        assert_eq!(ApiResponse::<()>::unauthorized(None).code, 401);
        assert_eq!(ApiResponse::<()>::not_found(None).code, 404);
        assert_eq!(ApiResponse::<()>::failed_dependency(None, vec![]).code, 424);
        assert_eq!(ApiResponse::<()>::internal_server_error().code, 500);
    }

    #[test]
    fn custom_message_overrides_default() {
        let response = ApiResponse::<()>::bad_request(Some("Account does not exist"));
        assert_eq!(response.message, "Account does not exist");
        assert!(response.data.is_none());
    }

    #[test]
    fn serializes_all_four_fields() {
        let response = ApiResponse::<()>::failed_dependency(
            None,
            vec![ErrorDetail::new("storage", "write rejected")],
        );
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["code"], 424);
        assert!(json["data"].is_null());
        assert_eq!(json["errors"][0]["code"], "storage");
        assert_eq!(json["errors"][0]["description"], "write rejected");
    }

    #[test]
    fn resource_flattens_item_fields() {
        #[derive(Serialize)]
        struct Item {
            id: &'static str,
        }
        let resource = Resource {
            item: Item { id: "abc" },
            links: vec![Link::new("http://x/api/account/abc", "self", "GET")],
        };
        let json = serde_json::to_value(&resource).unwrap();
        assert_eq!(json["id"], "abc");
        assert_eq!(json["links"][0]["rel"], "self");
    }
}
