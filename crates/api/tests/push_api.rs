//! Integration tests for push endpoint registration.

mod common;

use axum::http::StatusCode;
use common::{auth_token, body_json, build_test_app, send_json};
use serde_json::json;

// ---------------------------------------------------------------------------
// Test: registration requires authentication
// ---------------------------------------------------------------------------

#[tokio::test]
async fn register_without_token_returns_401() {
    let app = build_test_app();
    let response = send_json(
        app,
        "POST",
        "/api/v1/push/subscriptions",
        None,
        json!({ "payload": { "endpoint": "https://push.example/abc", "keys": {} } }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

// ---------------------------------------------------------------------------
// Test: an authenticated registration still fails cleanly on a dead store
// ---------------------------------------------------------------------------

#[tokio::test]
async fn register_with_unreachable_store_returns_500() {
    let app = build_test_app();
    let token = auth_token();
    let response = send_json(
        app,
        "POST",
        "/api/v1/push/subscriptions",
        Some(&token),
        json!({ "payload": { "endpoint": "https://push.example/abc", "keys": {} } }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    assert_eq!(json["code"], "INTERNAL_ERROR");
}
