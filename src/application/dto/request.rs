//! Request DTOs
//!
//! Data structures for API request bodies.

use serde::Deserialize;
use validator::Validate;

/// Token issuance request
#[derive(Debug, Deserialize, Validate)]
pub struct ObtainTokenRequest {
    #[validate(length(min = 1, max = 150, message = "Username must be 1-150 characters"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: String,
}

/// Refresh token request
#[derive(Debug, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Token verification request
#[derive(Debug, Deserialize)]
pub struct VerifyTokenRequest {
    pub token: String,
}

/// Create thread request
///
/// Participant ids arrive as strings, matching the id serialization in
/// responses. Count, distinctness, and membership rules are enforced by
/// the thread service.
#[derive(Debug, Deserialize)]
pub struct CreateThreadRequest {
    pub participants: Vec<String>,
}

/// Send message request
///
/// Any `sender` field in the body is ignored; the sender is always the
/// authenticated caller.
#[derive(Debug, Deserialize, Validate)]
pub struct SendMessageRequest {
    #[validate(length(min = 1, message = "Message text must not be empty"))]
    pub text: String,
}
