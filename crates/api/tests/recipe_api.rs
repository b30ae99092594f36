//! Integration tests for the recipe endpoints.
//!
//! These run against the full middleware stack with an unreachable
//! backing store, so they cover the paths that resolve before the
//! store (auth, validation, suggestion short-circuit) and the error
//! shape when the store cannot be reached.

mod common;

use axum::http::StatusCode;
use common::{auth_token, body_json, build_test_app, get, send_json};
use serde_json::json;

// ---------------------------------------------------------------------------
// Test: suggestions with an empty query short-circuit to an empty list
// ---------------------------------------------------------------------------

#[tokio::test]
async fn suggestions_with_empty_query_return_empty_list() {
    let app = build_test_app();
    let response = get(app, "/api/v1/recipes/suggestions").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json, json!([]));
}

#[tokio::test]
async fn suggestions_with_whitespace_query_return_empty_list() {
    let app = build_test_app();
    let response = get(app, "/api/v1/recipes/suggestions?q=%20%20").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json, json!([]));
}

#[tokio::test]
async fn suggestions_with_zero_limit_return_empty_list() {
    let app = build_test_app();
    let response = get(app, "/api/v1/recipes/suggestions?q=pasta&limit=0").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json, json!([]));
}

// ---------------------------------------------------------------------------
// Test: repeated array-form facet keys parse instead of rejecting
// ---------------------------------------------------------------------------

#[tokio::test]
async fn repeated_array_params_reach_the_query_path() {
    let app = build_test_app();
    // tags%5B%5D is the percent-encoded `tags[]` array form, repeated.
    let response = get(app, "/api/v1/recipes?tags%5B%5D=vegan&tags%5B%5D=quick").await;

    // The request must parse; with the store unreachable the query
    // path fails late with a sanitized 500, never an early 400.
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    assert_eq!(json["code"], "INTERNAL_ERROR");
}

// ---------------------------------------------------------------------------
// Test: store failure surfaces as a sanitized 500
// ---------------------------------------------------------------------------

#[tokio::test]
async fn recipe_listing_with_unreachable_store_returns_500() {
    let app = build_test_app();
    let response = get(app, "/api/v1/recipes?category=Dessert").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}

// ---------------------------------------------------------------------------
// Test: description update requires authentication
// ---------------------------------------------------------------------------

#[tokio::test]
async fn update_without_token_returns_401() {
    let app = build_test_app();
    let response = send_json(
        app,
        "PATCH",
        "/api/v1/recipes/1",
        None,
        json!({ "description": "A much longer description text", "userName": "alice" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn update_with_garbage_token_returns_401() {
    let app = build_test_app();
    let response = send_json(
        app,
        "PATCH",
        "/api/v1/recipes/1",
        Some("not-a-real-token"),
        json!({ "description": "A much longer description text", "userName": "alice" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Test: description update rejects a too-short description
// ---------------------------------------------------------------------------

#[tokio::test]
async fn update_with_short_description_returns_400() {
    let app = build_test_app();
    let token = auth_token();
    let response = send_json(
        app,
        "PATCH",
        "/api/v1/recipes/1",
        Some(&token),
        json!({ "description": "short", "userName": "alice" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

// ---------------------------------------------------------------------------
// Test: a valid, authenticated update still fails cleanly on a dead store
// ---------------------------------------------------------------------------

#[tokio::test]
async fn valid_update_with_unreachable_store_returns_500() {
    let app = build_test_app();
    let token = auth_token();
    let response = send_json(
        app,
        "PATCH",
        "/api/v1/recipes/1",
        Some(&token),
        json!({ "description": "A longer, perfectly valid description", "userName": "alice" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    assert_eq!(json["code"], "INTERNAL_ERROR");
}

// ---------------------------------------------------------------------------
// Test: favoriting requires authentication
// ---------------------------------------------------------------------------

#[tokio::test]
async fn favorite_without_token_returns_401() {
    let app = build_test_app();
    let response = send_json(app, "POST", "/api/v1/recipes/1/favorite", None, json!({})).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
