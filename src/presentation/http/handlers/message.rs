//! Message Handlers
//!
//! Listing and sending messages within a thread.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::application::dto::request::SendMessageRequest;
use crate::application::dto::response::MessageResponse;
use crate::application::services::{MessageError, MessageService, MessageServiceImpl};
use crate::infrastructure::repositories::{PgMessageRepository, PgThreadRepository};
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::shared::pagination::{Page, PageParams};
use crate::startup::AppState;

fn message_service(
    state: &AppState,
) -> MessageServiceImpl<PgMessageRepository, PgThreadRepository> {
    let message_repo = Arc::new(PgMessageRepository::new(state.db.clone()));
    let thread_repo = Arc::new(PgThreadRepository::new(state.db.clone()));
    MessageServiceImpl::new(message_repo, thread_repo)
}

fn map_message_error(e: MessageError) -> AppError {
    match e {
        // Both failure modes of the send endpoint surface as field-level
        // validation errors on `thread`.
        MessageError::ThreadNotFound | MessageError::NotParticipant => {
            AppError::validation("thread", e.to_string())
        }
        e => AppError::Internal(e.to_string()),
    }
}

/// List a thread's messages in creation order
pub async fn list_messages(
    State(state): State<AppState>,
    Path(thread_id): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<MessageResponse>>, AppError> {
    let thread_id: i64 = thread_id
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid thread id".into()))?;

    let (messages, count) = message_service(&state)
        .list_messages(thread_id, params.limit(), params.offset())
        .await
        .map_err(map_message_error)?;

    let results = messages.into_iter().map(MessageResponse::from).collect();
    let path = format!("/threads/{}/send_message/", thread_id);

    Ok(Json(Page::new(&path, &params, count, results)))
}

/// Send a message into a thread as the authenticated caller
pub async fn send_message(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(thread_id): Path<String>,
    Json(body): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let thread_id: i64 = thread_id
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid thread id".into()))?;

    body.validate()?;

    let message = message_service(&state)
        .send_message(auth.user_id, thread_id, &body.text)
        .await
        .map_err(map_message_error)?;

    Ok((StatusCode::CREATED, Json(MessageResponse::from(message))))
}
