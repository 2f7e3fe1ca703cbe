//! Authentication Handlers
//!
//! Token issuance, refresh, and verification endpoints.

use std::sync::Arc;

use axum::{extract::State, Json};
use validator::Validate;

use crate::application::dto::request::{
    ObtainTokenRequest, RefreshTokenRequest, VerifyTokenRequest,
};
use crate::application::dto::response::{AccessTokenResponse, TokenResponse};
use crate::application::services::{AuthError, AuthService, AuthServiceImpl};
use crate::infrastructure::repositories::PgUserRepository;
use crate::shared::error::AppError;
use crate::startup::AppState;

fn auth_service(state: &AppState) -> AuthServiceImpl<PgUserRepository> {
    let user_repo = Arc::new(PgUserRepository::new(state.db.clone()));
    AuthServiceImpl::new(user_repo, state.settings.jwt.clone())
}

fn map_auth_error(e: AuthError) -> AppError {
    match e {
        AuthError::InvalidCredentials => AppError::Unauthorized("Invalid credentials".into()),
        AuthError::TokenExpired => AppError::Unauthorized("Token expired".into()),
        AuthError::InvalidToken => AppError::Unauthorized("Invalid token".into()),
        e => AppError::Internal(e.to_string()),
    }
}

/// Obtain an access/refresh token pair for a credential pair
pub async fn obtain_token(
    State(state): State<AppState>,
    Json(body): Json<ObtainTokenRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    body.validate()?;

    let tokens = auth_service(&state)
        .obtain_tokens(&body.username, &body.password)
        .await
        .map_err(map_auth_error)?;

    Ok(Json(TokenResponse::from(tokens)))
}

/// Issue a fresh access token from a refresh token
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(body): Json<RefreshTokenRequest>,
) -> Result<Json<AccessTokenResponse>, AppError> {
    let token = auth_service(&state)
        .refresh_access_token(&body.refresh_token)
        .await
        .map_err(map_auth_error)?;

    Ok(Json(AccessTokenResponse::from(token)))
}

/// Check a token of either type for validity
pub async fn verify_token(
    State(state): State<AppState>,
    Json(body): Json<VerifyTokenRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth_service(&state)
        .verify_token(&body.token)
        .await
        .map_err(map_auth_error)?;

    Ok(Json(serde_json::json!({})))
}
