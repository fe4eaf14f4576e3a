//! HTTP-level integration tests for the `/api/goal` endpoints.

mod common;

use axum::http::StatusCode;
use common::{admin_token, body_json, delete_auth, get_auth, post_json_auth, put_json_auth, user_token};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

fn decimal(value: &Value) -> Decimal {
    value.as_str().expect("decimals serialize as strings").parse().unwrap()
}

async fn create_goal(app: &axum::Router, token: &str, name: &str, target_date: &str) -> Value {
    let body = json!({
        "name": name,
        "targetAmount": "5000",
        "targetDate": target_date,
    });
    let response = post_json_auth(app.clone(), "/api/goal", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

#[tokio::test]
async fn test_create_goal_defaults_current_amount() {
    let app = common::build_test_app().await.router;
    let token = user_token(&app, "alice").await;

    let goal = create_goal(&app, &token, "New car", "2026-06-30T00:00:00Z").await;

    assert_eq!(goal["name"], "New car");
    assert_eq!(decimal(&goal["targetAmount"]), dec!(5000));
    assert_eq!(decimal(&goal["currentAmount"]), dec!(0));
    assert_eq!(goal["createdBy"], "alice");
    let rels: Vec<_> = goal["links"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["rel"].as_str().unwrap())
        .collect();
    assert_eq!(rels, vec!["self", "update-goal", "delete-goal"]);
}

#[tokio::test]
async fn test_target_amount_must_be_positive() {
    let app = common::build_test_app().await.router;
    let token = user_token(&app, "bob").await;

    let body = json!({
        "name": "Nothing",
        "targetAmount": "0",
        "targetDate": "2026-01-01T00:00:00Z",
    });
    let response = post_json_auth(app, "/api/goal", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["errors"][0]["code"], "target_amount");
}

/// The caller reports progress; nothing derives it.
#[tokio::test]
async fn test_update_current_amount() {
    let app = common::build_test_app().await.router;
    let token = user_token(&app, "carol").await;
    let goal = create_goal(&app, &token, "Trip", "2026-03-01T00:00:00Z").await;
    let uri = format!("/api/goal/{}", goal["id"].as_str().unwrap());

    let response = put_json_auth(
        app.clone(),
        &uri,
        json!({ "currentAmount": "1250.50" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await["data"].clone();
    assert_eq!(decimal(&updated["currentAmount"]), dec!(1250.50));
    assert_eq!(updated["name"], "Trip");
    assert_eq!(updated["updatedBy"], "carol");

    let response = get_auth(app, &uri, &token).await;
    let fetched = body_json(response).await["data"].clone();
    assert_eq!(decimal(&fetched["currentAmount"]), dec!(1250.50));
}

#[tokio::test]
async fn test_unknown_goal_returns_404() {
    let app = common::build_test_app().await.router;
    let token = user_token(&app, "dave").await;

    let response = get_auth(app.clone(), "/api/goal/missing", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete_auth(app.clone(), "/api/goal/missing", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = put_json_auth(app, "/api/goal/missing", json!({ "name": "x" }), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_goal() {
    let app = common::build_test_app().await.router;
    let token = user_token(&app, "erin").await;
    let goal = create_goal(&app, &token, "Laptop", "2026-02-01T00:00:00Z").await;
    let uri = format!("/api/goal/{}", goal["id"].as_str().unwrap());

    let response = delete_auth(app.clone(), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["name"], "Laptop");

    let response = get_auth(app, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Name matches are case-insensitive substrings; target dates match by day.
#[tokio::test]
async fn test_list_filters() {
    let app = common::build_test_app().await.router;
    let token = user_token(&app, "frank").await;
    create_goal(&app, &token, "Emergency fund", "2026-01-15T08:00:00Z").await;
    create_goal(&app, &token, "House deposit", "2027-05-01T00:00:00Z").await;
    let admin = admin_token(&app).await;

    let response = get_auth(app.clone(), "/api/goal?name=FUND", &admin).await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["totalCount"], 1);
    assert_eq!(data["items"][0]["name"], "Emergency fund");

    let response = get_auth(app.clone(), "/api/goal?targetDate=2027-05-01", &admin).await;
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["totalCount"], 1);
    assert_eq!(data["items"][0]["name"], "House deposit");

    let response = get_auth(app, "/api/goal", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
