//! User Handlers
//!
//! The user directory listing.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};

use crate::application::dto::response::UserResponse;
use crate::application::services::{UserError, UserService, UserServiceImpl};
use crate::infrastructure::repositories::{PgMessageRepository, PgUserRepository};
use crate::shared::error::AppError;
use crate::shared::pagination::{Page, PageParams};
use crate::startup::AppState;

/// List all users with their unread-message counts
pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<UserResponse>>, AppError> {
    let user_repo = Arc::new(PgUserRepository::new(state.db.clone()));
    let message_repo = Arc::new(PgMessageRepository::new(state.db.clone()));
    let user_service = UserServiceImpl::new(user_repo, message_repo);

    let (users, count) = user_service
        .list_users(params.limit(), params.offset())
        .await
        .map_err(|e| match e {
            UserError::Internal(msg) => AppError::Internal(msg),
        })?;

    let results = users.into_iter().map(UserResponse::from).collect();

    Ok(Json(Page::new("/users/", &params, count, results)))
}
