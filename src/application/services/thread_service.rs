//! Thread Service
//!
//! Two-party thread listing, lookup-or-create, retrieval, and deletion.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::services::message_service::MessageDto;
use crate::domain::{MessageRepository, Thread, ThreadRepository, UserRepository, THREAD_PARTICIPANTS};
use crate::shared::error::AppError;

/// Thread service trait
#[async_trait]
pub trait ThreadService: Send + Sync {
    /// List the caller's threads, most recently updated first, with the
    /// total count
    async fn list_threads(
        &self,
        caller_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<ThreadDto>, i64), ThreadError>;

    /// Create a thread for the given participant pair, or return the
    /// existing one
    async fn create_thread(
        &self,
        caller_id: i64,
        participant_ids: &[i64],
    ) -> Result<ThreadDto, ThreadError>;

    /// Retrieve a thread with its full message list, caller must be a
    /// participant
    async fn get_thread(
        &self,
        caller_id: i64,
        thread_id: i64,
    ) -> Result<ThreadDetailDto, ThreadError>;

    /// Delete a thread and everything it owns
    async fn delete_thread(&self, thread_id: i64) -> Result<(), ThreadError>;
}

/// Thread data transfer object for list/create responses
#[derive(Debug, Clone)]
pub struct ThreadDto {
    pub id: String,
    pub participants: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
    pub last_message: Option<MessageDto>,
}

/// Thread data transfer object for retrieve responses
#[derive(Debug, Clone)]
pub struct ThreadDetailDto {
    pub id: String,
    pub messages: Vec<MessageDto>,
}

/// Thread service errors
#[derive(Debug, thiserror::Error)]
pub enum ThreadError {
    /// Participant list failed a field-level rule
    #[error("{0}")]
    Validation(String),

    /// Missing thread, or the caller is not a participant. The two cases
    /// share one error so responses never reveal whether a thread exists.
    #[error("Thread not found")]
    NotFound,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// ThreadService implementation
///
/// The duplicate check in `create_thread` is a read followed by a
/// conditional write with no isolation against a concurrent create for
/// the same pair. Accepted at this contention level.
pub struct ThreadServiceImpl<T, M, U>
where
    T: ThreadRepository,
    M: MessageRepository,
    U: UserRepository,
{
    thread_repo: Arc<T>,
    message_repo: Arc<M>,
    user_repo: Arc<U>,
}

impl<T, M, U> ThreadServiceImpl<T, M, U>
where
    T: ThreadRepository,
    M: MessageRepository,
    U: UserRepository,
{
    pub fn new(thread_repo: Arc<T>, message_repo: Arc<M>, user_repo: Arc<U>) -> Self {
        Self {
            thread_repo,
            message_repo,
            user_repo,
        }
    }

    /// Attach the newest message to a thread row.
    async fn to_dto(&self, thread: Thread) -> Result<ThreadDto, ThreadError> {
        let last_message = self
            .message_repo
            .find_last_by_thread(thread.id)
            .await
            .map_err(|e| ThreadError::Internal(e.to_string()))?;

        Ok(ThreadDto {
            id: thread.id.to_string(),
            participants: thread
                .participant_ids
                .iter()
                .map(|id| id.to_string())
                .collect(),
            created_at: thread.created_at.to_rfc3339(),
            updated_at: thread.updated_at.to_rfc3339(),
            last_message: last_message.map(MessageDto::from),
        })
    }

    /// Field-level rules for the participant list.
    async fn validate_participants(
        &self,
        caller_id: i64,
        participant_ids: &[i64],
    ) -> Result<(), ThreadError> {
        if participant_ids.len() != THREAD_PARTICIPANTS {
            return Err(ThreadError::Validation(
                "A thread has exactly two participants".into(),
            ));
        }

        if participant_ids[0] == participant_ids[1] {
            return Err(ThreadError::Validation(
                "Participants must be two distinct users".into(),
            ));
        }

        if !participant_ids.contains(&caller_id) {
            return Err(ThreadError::Validation(
                "You must be one of the thread's participants".into(),
            ));
        }

        for &id in participant_ids {
            let exists = self
                .user_repo
                .find_by_id(id)
                .await
                .map_err(|e| ThreadError::Internal(e.to_string()))?
                .is_some();
            if !exists {
                return Err(ThreadError::Validation(format!("Unknown participant id: {}", id)));
            }
        }

        Ok(())
    }
}

#[async_trait]
impl<T, M, U> ThreadService for ThreadServiceImpl<T, M, U>
where
    T: ThreadRepository + 'static,
    M: MessageRepository + 'static,
    U: UserRepository + 'static,
{
    async fn list_threads(
        &self,
        caller_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<ThreadDto>, i64), ThreadError> {
        let threads = self
            .thread_repo
            .list_for_user(caller_id, limit, offset)
            .await
            .map_err(|e| ThreadError::Internal(e.to_string()))?;

        let count = self
            .thread_repo
            .count_for_user(caller_id)
            .await
            .map_err(|e| ThreadError::Internal(e.to_string()))?;

        let mut dtos = Vec::with_capacity(threads.len());
        for thread in threads {
            dtos.push(self.to_dto(thread).await?);
        }

        Ok((dtos, count))
    }

    async fn create_thread(
        &self,
        caller_id: i64,
        participant_ids: &[i64],
    ) -> Result<ThreadDto, ThreadError> {
        self.validate_participants(caller_id, participant_ids).await?;

        // Lookup-or-create: reuse the existing thread for this pair.
        let existing = self
            .thread_repo
            .find_by_participant_pair(participant_ids[0], participant_ids[1])
            .await
            .map_err(|e| ThreadError::Internal(e.to_string()))?;

        let thread = match existing {
            Some(thread) => thread,
            None => self
                .thread_repo
                .create(participant_ids)
                .await
                .map_err(|e| ThreadError::Internal(e.to_string()))?,
        };

        self.to_dto(thread).await
    }

    async fn get_thread(
        &self,
        caller_id: i64,
        thread_id: i64,
    ) -> Result<ThreadDetailDto, ThreadError> {
        let thread = self
            .thread_repo
            .find_by_id(thread_id)
            .await
            .map_err(|e| ThreadError::Internal(e.to_string()))?
            .ok_or(ThreadError::NotFound)?;

        if !thread.has_participant(caller_id) {
            return Err(ThreadError::NotFound);
        }

        let messages = self
            .message_repo
            .list_all_by_thread(thread_id)
            .await
            .map_err(|e| ThreadError::Internal(e.to_string()))?;

        Ok(ThreadDetailDto {
            id: thread.id.to_string(),
            messages: messages.into_iter().map(MessageDto::from).collect(),
        })
    }

    async fn delete_thread(&self, thread_id: i64) -> Result<(), ThreadError> {
        self.thread_repo
            .delete(thread_id)
            .await
            .map_err(|e| match e {
                AppError::NotFound(_) => ThreadError::NotFound,
                e => ThreadError::Internal(e.to_string()),
            })
    }
}
