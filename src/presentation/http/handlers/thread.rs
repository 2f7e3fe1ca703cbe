//! Thread Handlers
//!
//! Listing, lookup-or-create, retrieval, and deletion of threads.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::application::dto::request::CreateThreadRequest;
use crate::application::dto::response::{ThreadDetailResponse, ThreadResponse};
use crate::application::services::{ThreadError, ThreadService, ThreadServiceImpl};
use crate::infrastructure::repositories::{
    PgMessageRepository, PgThreadRepository, PgUserRepository,
};
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::shared::pagination::{Page, PageParams};
use crate::startup::AppState;

fn thread_service(
    state: &AppState,
) -> ThreadServiceImpl<PgThreadRepository, PgMessageRepository, PgUserRepository> {
    let thread_repo = Arc::new(PgThreadRepository::new(state.db.clone()));
    let message_repo = Arc::new(PgMessageRepository::new(state.db.clone()));
    let user_repo = Arc::new(PgUserRepository::new(state.db.clone()));
    ThreadServiceImpl::new(thread_repo, message_repo, user_repo)
}

fn map_thread_error(e: ThreadError) -> AppError {
    match e {
        ThreadError::Validation(msg) => AppError::validation("participants", msg),
        ThreadError::NotFound => AppError::NotFound("Thread not found".into()),
        e => AppError::Internal(e.to_string()),
    }
}

/// List the caller's threads, most recently updated first
pub async fn list_threads(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<ThreadResponse>>, AppError> {
    let (threads, count) = thread_service(&state)
        .list_threads(auth.user_id, params.limit(), params.offset())
        .await
        .map_err(map_thread_error)?;

    let results = threads.into_iter().map(ThreadResponse::from).collect();

    Ok(Json(Page::new("/threads/", &params, count, results)))
}

/// Create a thread for a participant pair, or return the existing one
pub async fn create_thread(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<CreateThreadRequest>,
) -> Result<(StatusCode, Json<ThreadResponse>), AppError> {
    let mut participant_ids = Vec::with_capacity(body.participants.len());
    for raw in &body.participants {
        let id: i64 = raw
            .parse()
            .map_err(|_| AppError::validation("participants", format!("Invalid participant id: {}", raw)))?;
        participant_ids.push(id);
    }

    let thread = thread_service(&state)
        .create_thread(auth.user_id, &participant_ids)
        .await
        .map_err(map_thread_error)?;

    Ok((StatusCode::CREATED, Json(ThreadResponse::from(thread))))
}

/// Retrieve a thread with its full message list
pub async fn get_thread(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(thread_id): Path<String>,
) -> Result<Json<ThreadDetailResponse>, AppError> {
    // A malformed id is indistinguishable from a missing thread.
    let thread_id: i64 = thread_id
        .parse()
        .map_err(|_| AppError::NotFound("Thread not found".into()))?;

    let thread = thread_service(&state)
        .get_thread(auth.user_id, thread_id)
        .await
        .map_err(map_thread_error)?;

    Ok(Json(ThreadDetailResponse::from(thread)))
}

/// Delete a thread and its messages
///
/// Any authenticated user may delete any thread; there is no
/// participant-membership check on this endpoint.
pub async fn delete_thread(
    State(state): State<AppState>,
    Path(thread_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let thread_id: i64 = thread_id
        .parse()
        .map_err(|_| AppError::NotFound("Thread not found".into()))?;

    thread_service(&state)
        .delete_thread(thread_id)
        .await
        .map_err(map_thread_error)?;

    Ok(StatusCode::NO_CONTENT)
}
