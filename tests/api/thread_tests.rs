//! Thread & Message API Tests
//!
//! Exercises authentication enforcement, id parsing, and request
//! validation on the chat endpoints — the paths that resolve before any
//! database access.

use axum::http::StatusCode;
use chrono::Duration;
use tower::ServiceExt;

use parley::application::services::{TOKEN_TYPE_ACCESS, TOKEN_TYPE_REFRESH};

use crate::common::{body_json, TestApp};

#[tokio::test]
async fn test_protected_routes_require_a_token() {
    let app = TestApp::new();

    assert_eq!(app.get("/threads/").await.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(app.get("/users/").await.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        app.get("/threads/1/send_message/").await.status(),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        app.post_json("/threads/create/", r#"{"participants": ["1", "2"]}"#)
            .await
            .status(),
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn test_missing_token_error_envelope() {
    let app = TestApp::new();

    let response = app.get("/threads/").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Missing authorization header");
    assert!(body["code"].is_number());
}

#[tokio::test]
async fn test_non_bearer_scheme_is_rejected() {
    let app = TestApp::new();
    let token = app.mint_token(1, TOKEN_TYPE_ACCESS, Duration::minutes(15));

    let response = app
        .router
        .clone()
        .oneshot(
            axum::http::Request::builder()
                .method("GET")
                .uri("/threads/")
                .header("Authorization", format!("Basic {}", token))
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_token_cannot_reach_protected_routes() {
    let app = TestApp::new();
    let refresh = app.mint_token(1, TOKEN_TYPE_REFRESH, Duration::days(7));

    let response = app.get_auth("/threads/", &refresh).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_access_token_is_rejected() {
    let app = TestApp::new();
    let token = app.mint_token(1, TOKEN_TYPE_ACCESS, Duration::minutes(-10));

    let response = app.get_auth("/threads/", &token).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Token expired");
}

#[tokio::test]
async fn test_malformed_thread_id_is_not_found() {
    let app = TestApp::new();
    let token = app.mint_token(1, TOKEN_TYPE_ACCESS, Duration::minutes(15));

    let retrieve = app.get_auth("/threads/not-a-number/", &token).await;
    let delete = app.delete_auth("/threads/not-a-number/delete/", &token).await;

    assert_eq!(retrieve.status(), StatusCode::NOT_FOUND);
    assert_eq!(delete.status(), StatusCode::NOT_FOUND);

    let body = body_json(retrieve).await;
    assert_eq!(body["message"], "Thread not found");
}

#[tokio::test]
async fn test_empty_message_text_is_a_field_error() {
    let app = TestApp::new();
    let token = app.mint_token(1, TOKEN_TYPE_ACCESS, Duration::minutes(15));

    let response = app
        .post_json_auth("/threads/1/send_message/", r#"{"text": ""}"#, &token)
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["errors"][0]["field"], "text");
}

#[tokio::test]
async fn test_non_numeric_participant_id_is_a_field_error() {
    let app = TestApp::new();
    let token = app.mint_token(1, TOKEN_TYPE_ACCESS, Duration::minutes(15));

    let response = app
        .post_json_auth(
            "/threads/create/",
            r#"{"participants": ["1", "bogus"]}"#,
            &token,
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["errors"][0]["field"], "participants");
}

#[tokio::test]
async fn test_wrong_participant_count_is_a_field_error() {
    let app = TestApp::new();
    let token = app.mint_token(1, TOKEN_TYPE_ACCESS, Duration::minutes(15));

    for body in [
        r#"{"participants": ["1"]}"#,
        r#"{"participants": ["1", "2", "3"]}"#,
    ] {
        let response = app.post_json_auth("/threads/create/", body, &token).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(
            body["errors"][0]["message"],
            "A thread has exactly two participants"
        );
    }
}

#[tokio::test]
async fn test_caller_must_be_a_participant_to_create() {
    let app = TestApp::new();
    let token = app.mint_token(1, TOKEN_TYPE_ACCESS, Duration::minutes(15));

    let response = app
        .post_json_auth("/threads/create/", r#"{"participants": ["2", "3"]}"#, &token)
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["errors"][0]["field"], "participants");
}

#[tokio::test]
async fn test_duplicate_participants_are_rejected() {
    let app = TestApp::new();
    let token = app.mint_token(1, TOKEN_TYPE_ACCESS, Duration::minutes(15));

    let response = app
        .post_json_auth("/threads/create/", r#"{"participants": ["1", "1"]}"#, &token)
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
