#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use fintrack_api::auth::jwt::JwtConfig;
use fintrack_api::config::{BlobBackend, BlobConfig, DefaultAdminConfig, ServerConfig};
use fintrack_api::router::build_app_router;
use fintrack_api::services::auth::seed_default_admin;
use fintrack_api::state::AppState;
use fintrack_api::storage::MemoryBlobStore;
use fintrack_db::repositories::{MemoryStore, Repositories};

pub const BASE_URL: &str = "http://localhost:3000";
pub const TEST_PASSWORD: &str = "correct-horse-9";
pub const ADMIN_EMAIL: &str = "admin@fintrack.test";
pub const ADMIN_PASSWORD: &str = "admin-password-1";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        public_base_url: BASE_URL.to_string(),
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        database_url: None,
        jwt: JwtConfig {
            secret: "integration-test-secret-with-enough-length".to_string(),
            issuer: "fintrack".to_string(),
            audience: "fintrack-clients".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_mins: 60,
        },
        blob: BlobConfig {
            backend: BlobBackend::Memory,
            bucket: "unused".to_string(),
            public_base_url: format!("{BASE_URL}/api/blobs"),
        },
        default_admin: Some(DefaultAdminConfig {
            email: ADMIN_EMAIL.to_string(),
            password: ADMIN_PASSWORD.to_string(),
            first_name: "Ada".to_string(),
            last_name: "Admin".to_string(),
        }),
    }
}

/// The full application on the in-memory store, plus handles on its
/// backing store for tests that need to reach underneath the API.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub state: AppState,
}

/// Build the full application router with all middleware layers, using the
/// in-memory store and blob backend. The default administrator is seeded.
pub async fn build_test_app() -> TestApp {
    let config = test_config();
    let store = Arc::new(MemoryStore::new());
    let repos = Repositories::in_memory(store.clone());

    if let Some(admin) = &config.default_admin {
        seed_default_admin(&repos, admin)
            .await
            .expect("seeding should succeed");
    }

    let blobs = Arc::new(MemoryBlobStore::new(config.blob.public_base_url.clone()));
    let state = AppState::new(config.clone(), None, repos, blobs);
    let router = build_app_router(state.clone(), &config);

    TestApp {
        router,
        store,
        state,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

fn json_request(method: Method, uri: &str, body: &Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

fn empty_request(method: Method, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, empty_request(Method::GET, uri, None)).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, empty_request(Method::GET, uri, Some(token))).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, empty_request(Method::DELETE, uri, Some(token))).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    send(app, json_request(Method::POST, uri, &body, None)).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response {
    send(app, json_request(Method::POST, uri, &body, Some(token))).await
}

pub async fn put_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response {
    send(app, json_request(Method::PUT, uri, &body, Some(token))).await
}

pub async fn patch_json(app: Router, uri: &str, body: Value) -> Response {
    send(app, json_request(Method::PATCH, uri, &body, None)).await
}

/// Send a pre-built request.
pub async fn request(app: Router, request: Request<Body>) -> Response {
    send(app, request).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Auth helpers
// ---------------------------------------------------------------------------

/// Register a fresh `User`-role account and return the auth response data
/// (`token`, `refreshToken`, `expiresIn`).
pub async fn register(app: &Router, user_name: &str) -> Value {
    let body = serde_json::json!({
        "email": format!("{user_name}@fintrack.test"),
        "userName": user_name,
        "password": TEST_PASSWORD,
        "firstName": "Test",
        "lastName": "User",
    });
    let response = post_json(app.clone(), "/api/auth/register", body).await;
    assert_eq!(response.status(), 201, "registration should succeed");
    body_json(response).await["data"].clone()
}

/// Register a user and return just the access token.
pub async fn user_token(app: &Router, user_name: &str) -> String {
    register(app, user_name).await["token"]
        .as_str()
        .unwrap()
        .to_string()
}

/// Log in as the seeded administrator and return the access token.
pub async fn admin_token(app: &Router) -> String {
    let body = serde_json::json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD });
    let response = post_json(app.clone(), "/api/auth/login", body).await;
    assert_eq!(response.status(), 200, "admin login should succeed");
    body_json(response).await["data"]["token"]
        .as_str()
        .unwrap()
        .to_string()
}

/// Create an account through the API and return its `data` object.
pub async fn create_account(app: &Router, token: &str, name: &str, balance: &str) -> Value {
    let body = serde_json::json!({
        "name": name,
        "balance": balance,
        "accountType": "Savings",
    });
    let response = post_json_auth(app.clone(), "/api/account", body, token).await;
    assert_eq!(response.status(), 201, "account creation should succeed");
    body_json(response).await["data"].clone()
}
