//! The health endpoint and the cross-cutting middleware stack.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, get};

#[tokio::test]
async fn test_health_reports_memory_store() {
    let app = common::build_test_app().await.router;

    let response = get(app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["store"], "memory");
    assert_eq!(json["blobStore"], "memory");
    assert_eq!(json["dbHealthy"], true);
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = common::build_test_app().await.router;

    let response = get(app, "/api/nowhere").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cors_preflight_allows_upload_headers() {
    let app = common::build_test_app().await.router;

    let preflight = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/blobs")
        .header("origin", "http://localhost:5173")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "x-xsrf-token,authorization")
        .body(Body::empty())
        .unwrap();
    let response = common::request(app.clone(), preflight).await;
    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], "http://localhost:5173");
    let allowed = headers["access-control-allow-headers"].to_str().unwrap();
    assert!(allowed.contains("x-xsrf-token"), "{allowed}");

    let simple = Request::builder()
        .uri("/health")
        .header("origin", "http://localhost:5173")
        .body(Body::empty())
        .unwrap();
    let response = common::request(app, simple).await;
    assert_eq!(response.headers()["access-control-expose-headers"], "x-request-id");
}
