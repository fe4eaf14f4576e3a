//! HTTP-level integration tests for blob uploads and image records.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use common::{body_json, delete_auth, get, get_auth, user_token};
use serde_json::Value;

const BOUNDARY: &str = "----fintrack-test-boundary";

async fn antiforgery_token(app: &Router) -> String {
    let response = get(app.clone(), "/api/blobs/get-anti-forgery-token").await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"]["requestToken"]
        .as_str()
        .unwrap()
        .to_string()
}

fn multipart_body(file_name: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: image/png\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

async fn post_upload(
    app: &Router,
    token: &str,
    xsrf: Option<&str>,
    file_name: &str,
    content: &[u8],
) -> axum::response::Response {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri("/api/blobs")
        .header("authorization", format!("Bearer {token}"))
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    if let Some(xsrf) = xsrf {
        builder = builder.header("X-XSRF-TOKEN", xsrf);
    }
    let request = builder
        .body(Body::from(multipart_body(file_name, content)))
        .unwrap();
    common::request(app.clone(), request).await
}

/// Upload `cat.png` and return the blob payload.
async fn upload_cat(app: &Router, token: &str) -> Value {
    let xsrf = antiforgery_token(app).await;
    let response = post_upload(app, token, Some(&xsrf), "cat.png", &[7u8; 1536]).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"].clone()
}

#[tokio::test]
async fn test_antiforgery_token_is_anonymous() {
    let app = common::build_test_app().await.router;

    let response = get(app, "/api/blobs/get-anti-forgery-token").await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(response).await["data"].clone();
    assert!(data["requestToken"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(data["headerName"], "X-XSRF-TOKEN");
}

#[tokio::test]
async fn test_upload_requires_antiforgery_token() {
    let app = common::build_test_app().await.router;
    let token = user_token(&app, "alice").await;

    let response = post_upload(&app, &token, None, "cat.png", b"meow").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_upload(&app, &token, Some("forged.token"), "cat.png", b"meow").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_records_blob_and_image() {
    let app = common::build_test_app().await.router;
    let token = user_token(&app, "bob").await;

    let blob = upload_cat(&app, &token).await;
    let file_name = blob["fileName"].as_str().unwrap().to_string();
    assert!(file_name.ends_with(".png"));
    assert_eq!(blob["originalFileName"], "cat.png");
    assert_eq!(blob["size"], 1536);
    assert_eq!(blob["readableSize"], "1.5 KB");
    assert_eq!(
        blob["url"],
        format!("{}/api/blobs/{file_name}", common::BASE_URL)
    );

    let response = get_auth(app.clone(), &format!("/api/blobs/{file_name}"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_auth(app.clone(), "/api/images?originalFileName=cat", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["totalCount"], 1);
    let image = &data["items"][0];
    assert_eq!(image["fileName"], file_name.as_str());
    assert_eq!(image["fileExtension"], ".png");
    assert_eq!(image["createdBy"], "bob");
    let rels: Vec<_> = image["links"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["rel"].as_str().unwrap())
        .collect();
    assert_eq!(rels, vec!["self", "delete-image"]);
}

/// Deleting an image removes its blob too.
#[tokio::test]
async fn test_delete_image_removes_blob() {
    let app = common::build_test_app().await.router;
    let token = user_token(&app, "carol").await;
    let blob = upload_cat(&app, &token).await;
    let file_name = blob["fileName"].as_str().unwrap();

    let response = get_auth(app.clone(), "/api/images", &token).await;
    let image_id = body_json(response).await["data"]["items"][0]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = delete_auth(app.clone(), &format!("/api/images/{image_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["fileName"], file_name);

    let response = get_auth(app.clone(), &format!("/api/blobs/{file_name}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get_auth(app, &format!("/api/images/{image_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Deleting a blob removes its image row and answers 202.
#[tokio::test]
async fn test_delete_blob_removes_image() {
    let app = common::build_test_app().await.router;
    let token = user_token(&app, "dave").await;
    let blob = upload_cat(&app, &token).await;
    let file_name = blob["fileName"].as_str().unwrap();

    let response = delete_auth(app.clone(), &format!("/api/blobs/{file_name}"), &token).await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    assert_eq!(body_json(response).await["data"], file_name);

    let response = get_auth(app, "/api/images", &token).await;
    assert_eq!(body_json(response).await["data"]["totalCount"], 0);
}

#[tokio::test]
async fn test_delete_unknown_targets() {
    let app = common::build_test_app().await.router;
    let token = user_token(&app, "erin").await;

    let response = delete_auth(app.clone(), "/api/blobs/nothing.png", &token).await;
    assert_eq!(response.status(), StatusCode::FAILED_DEPENDENCY);
    let json = body_json(response).await;
    assert_eq!(json["errors"][0]["code"], "Blob");

    let response = delete_auth(app.clone(), "/api/images/missing", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get_auth(app, "/api/blobs/nothing.png", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_blob_list() {
    let app = common::build_test_app().await.router;
    let token = user_token(&app, "frank").await;
    upload_cat(&app, &token).await;
    upload_cat(&app, &token).await;

    let response = get_auth(app.clone(), "/api/blobs", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 2);

    let response = get(app, "/api/blobs").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
