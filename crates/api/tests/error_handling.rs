//! Failure paths that must still answer with the JSON envelope: writes the
//! store refuses, malformed query strings and out-of-range paging.

mod common;

use axum::http::StatusCode;
use axum::Router;
use common::{
    admin_token, body_json, create_account, delete_auth, get_auth, post_json_auth,
    put_json_auth, user_token,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

fn decimal(value: &Value) -> Decimal {
    value.as_str().expect("decimals serialize as strings").parse().unwrap()
}

async fn balance_of(app: &Router, token: &str, account_id: &str) -> Decimal {
    let response = get_auth(app.clone(), &format!("/api/account/{account_id}"), token).await;
    assert_eq!(response.status(), StatusCode::OK);
    decimal(&body_json(response).await["data"]["balance"])
}

/// Assert a 424 envelope naming `entity` in its error detail.
async fn assert_not_saved(response: axum::response::Response, entity: &str) {
    assert_eq!(response.status(), StatusCode::FAILED_DEPENDENCY);
    let json = body_json(response).await;
    assert_eq!(json["code"], 424);
    assert!(json["data"].is_null());
    assert_eq!(json["errors"][0]["code"], entity);
    assert_eq!(
        json["errors"][0]["description"],
        format!("The {} could not be saved", entity.to_ascii_lowercase())
    );
}

// ---------------------------------------------------------------------------
// Writes the store refuses become 424
// ---------------------------------------------------------------------------

#[tokio::test]
async fn account_writes_refused_by_store_return_424() {
    let app = common::build_test_app().await;
    let token = user_token(&app.router, "alice").await;
    let account = create_account(&app.router, &token, "Main", "10").await;
    let uri = format!("/api/account/{}", account["id"].as_str().unwrap());

    app.store.reject_writes(true);

    let body = json!({ "name": "Spare", "accountType": "Current" });
    let response = post_json_auth(app.router.clone(), "/api/account", body, &token).await;
    assert_not_saved(response, "Account").await;

    let body = json!({ "balance": "99" });
    let response = put_json_auth(app.router.clone(), &uri, body, &token).await;
    assert_not_saved(response, "Account").await;

    let response = delete_auth(app.router.clone(), &uri, &token).await;
    assert_not_saved(response, "Account").await;

    app.store.reject_writes(false);
    assert_eq!(balance_of(&app.router, &token, account["id"].as_str().unwrap()).await, dec!(10));
}

#[tokio::test]
async fn goal_writes_refused_by_store_return_424() {
    let app = common::build_test_app().await;
    let token = user_token(&app.router, "bob").await;
    let body = json!({
        "name": "Bike",
        "targetAmount": "800",
        "targetDate": "2026-09-01T00:00:00Z",
    });
    let response = post_json_auth(app.router.clone(), "/api/goal", body.clone(), &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let goal = body_json(response).await["data"].clone();
    let uri = format!("/api/goal/{}", goal["id"].as_str().unwrap());

    app.store.reject_writes(true);

    let response = post_json_auth(app.router.clone(), "/api/goal", body, &token).await;
    assert_not_saved(response, "Goal").await;

    let response =
        put_json_auth(app.router.clone(), &uri, json!({ "currentAmount": "50" }), &token).await;
    assert_not_saved(response, "Goal").await;

    let response = delete_auth(app.router.clone(), &uri, &token).await;
    assert_not_saved(response, "Goal").await;

    app.store.reject_writes(false);
    let response = get_auth(app.router, &uri, &token).await;
    assert_eq!(decimal(&body_json(response).await["data"]["currentAmount"]), dec!(0));
}

/// A refused transaction write leaves the account balance untouched.
#[tokio::test]
async fn transaction_writes_refused_by_store_keep_balance() {
    let app = common::build_test_app().await;
    let token = user_token(&app.router, "carol").await;
    let admin = admin_token(&app.router).await;
    let account = create_account(&app.router, &token, "Main", "100").await;
    let account_id = account["id"].as_str().unwrap();

    let body = json!({
        "accountId": account_id,
        "amount": "40",
        "transactionDate": "2025-03-01T09:30:00Z",
        "transactionType": "Expense",
    });
    let response = post_json_auth(app.router.clone(), "/api/transaction", body.clone(), &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let transaction = body_json(response).await["data"].clone();
    let uri = format!("/api/transaction/{}", transaction["id"].as_str().unwrap());
    assert_eq!(balance_of(&app.router, &token, account_id).await, dec!(60));

    app.store.reject_writes(true);

    let response = post_json_auth(app.router.clone(), "/api/transaction", body, &token).await;
    assert_not_saved(response, "Transaction").await;

    let response = put_json_auth(app.router.clone(), &uri, json!({ "amount": "10" }), &admin).await;
    assert_not_saved(response, "Transaction").await;

    let response = delete_auth(app.router.clone(), &uri, &admin).await;
    assert_not_saved(response, "Transaction").await;

    app.store.reject_writes(false);
    assert_eq!(balance_of(&app.router, &token, account_id).await, dec!(60));
    let response = get_auth(app.router, &uri, &token).await;
    assert_eq!(decimal(&body_json(response).await["data"]["amount"]), dec!(40));
}

// ---------------------------------------------------------------------------
// Query strings
// ---------------------------------------------------------------------------

#[tokio::test]
async fn malformed_query_values_return_envelope() {
    let app = common::build_test_app().await.router;
    let admin = admin_token(&app).await;

    for uri in [
        "/api/account?accountType=Bogus",
        "/api/goal?page=abc",
        "/api/transaction?fromDate=yesterday",
        "/api/images?toDate=2025-13-01",
    ] {
        let response = get_auth(app.clone(), uri, &admin).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        let json = body_json(response).await;
        assert_eq!(json["code"], 400, "{uri}");
        assert!(json["message"].as_str().is_some_and(|m| !m.is_empty()), "{uri}");
        assert!(json["data"].is_null(), "{uri}");
    }
}

/// Date-only bounds are read as midnight UTC.
#[tokio::test]
async fn date_only_bounds_are_accepted() {
    let app = common::build_test_app().await.router;
    let token = user_token(&app, "dave").await;
    create_account(&app, &token, "Main", "0").await;
    let admin = admin_token(&app).await;

    let response = get_auth(app.clone(), "/api/account?fromDate=2025-01-01", &admin).await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["totalCount"], 1);
    assert!(data["links"][0]["href"]
        .as_str()
        .unwrap()
        .contains("fromDate=2025-01-01T00%3A00%3A00%2B00%3A00"));

    let response = get_auth(app, "/api/transaction?toDate=2000-01-01", &admin).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["totalCount"], 0);
}

#[tokio::test]
async fn oversized_page_size_is_capped() {
    let app = common::build_test_app().await.router;
    let token = user_token(&app, "erin").await;
    create_account(&app, &token, "Main", "0").await;
    let admin = admin_token(&app).await;

    let response = get_auth(app, "/api/account?pageSize=9223372036854775807", &admin).await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["pageSize"], 100);
    assert_eq!(data["totalPages"], 1);
    assert_eq!(data["totalCount"], 1);
}
