//! Authentication API Tests
//!
//! Token verification and refresh are stateless, so these run entirely
//! against self-minted tokens.

use axum::http::StatusCode;
use chrono::Duration;

use parley::application::services::{TOKEN_TYPE_ACCESS, TOKEN_TYPE_REFRESH};

use crate::common::{body_json, TestApp};

#[tokio::test]
async fn test_verify_accepts_valid_access_token() {
    let app = TestApp::new();
    let token = app.mint_token(1, TOKEN_TYPE_ACCESS, Duration::minutes(15));

    let body = serde_json::json!({ "token": token }).to_string();
    let response = app.post_json("/api/token/verify/", &body).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, serde_json::json!({}));
}

#[tokio::test]
async fn test_verify_accepts_valid_refresh_token() {
    let app = TestApp::new();
    let token = app.mint_token(1, TOKEN_TYPE_REFRESH, Duration::days(7));

    let body = serde_json::json!({ "token": token }).to_string();
    let response = app.post_json("/api/token/verify/", &body).await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_verify_rejects_garbage_token() {
    let app = TestApp::new();

    let response = app
        .post_json("/api/token/verify/", r#"{"token": "not-a-jwt"}"#)
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Invalid token");
}

#[tokio::test]
async fn test_verify_rejects_expired_token() {
    let app = TestApp::new();
    let token = app.mint_token(1, TOKEN_TYPE_ACCESS, Duration::minutes(-10));

    let body = serde_json::json!({ "token": token }).to_string();
    let response = app.post_json("/api/token/verify/", &body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Token expired");
}

#[tokio::test]
async fn test_refresh_issues_access_token() {
    let app = TestApp::new();
    let refresh = app.mint_token(7, TOKEN_TYPE_REFRESH, Duration::days(7));

    let body = serde_json::json!({ "refresh_token": refresh }).to_string();
    let response = app.post_json("/api/token/refresh/", &body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["access_token"].is_string());
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["expires_in"], 15 * 60);
}

#[tokio::test]
async fn test_refresh_rejects_access_token() {
    let app = TestApp::new();
    let access = app.mint_token(7, TOKEN_TYPE_ACCESS, Duration::minutes(15));

    let body = serde_json::json!({ "refresh_token": access }).to_string();
    let response = app.post_json("/api/token/refresh/", &body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refreshed_access_token_passes_the_middleware() {
    let app = TestApp::new();
    let refresh = app.mint_token(7, TOKEN_TYPE_REFRESH, Duration::days(7));

    let body = serde_json::json!({ "refresh_token": refresh }).to_string();
    let response = app.post_json("/api/token/refresh/", &body).await;
    let access = body_json(response).await["access_token"]
        .as_str()
        .unwrap()
        .to_string();

    // A malformed thread id stops at the handler, before any database
    // access; reaching 404 proves the token cleared the middleware.
    let response = app.get_auth("/threads/not-a-number/", &access).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
