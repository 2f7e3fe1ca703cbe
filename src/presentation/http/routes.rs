//! Route Configuration
//!
//! Configures all HTTP routes for the API.

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

use super::handlers;
use crate::presentation::middleware::auth_middleware;
use crate::startup::AppState;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Public token endpoints
        .merge(token_routes())
        // Protected chat endpoints (require a bearer access token)
        .merge(chat_routes(state.clone()))
        // Health check endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/health/live", get(handlers::health::liveness))
        .route("/health/ready", get(handlers::health::readiness))
        .with_state(state)
}

/// Token issuance routes (public)
fn token_routes() -> Router<AppState> {
    Router::new()
        .route("/api/token/", post(handlers::auth::obtain_token))
        .route("/api/token/refresh/", post(handlers::auth::refresh_token))
        .route("/api/token/verify/", post(handlers::auth::verify_token))
}

/// Thread, message, and user routes (protected)
fn chat_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/threads/", get(handlers::thread::list_threads))
        .route("/threads/create/", post(handlers::thread::create_thread))
        .route("/threads/{thread_id}/", get(handlers::thread::get_thread))
        .route(
            "/threads/{thread_id}/delete/",
            delete(handlers::thread::delete_thread),
        )
        .route(
            "/threads/{thread_id}/send_message/",
            get(handlers::message::list_messages).post(handlers::message::send_message),
        )
        .route("/users/", get(handlers::user::list_users))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
