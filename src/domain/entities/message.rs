//! Message entity and repository trait.
//!
//! Maps to the `messages` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Represents a message inside a thread.
///
/// Maps to the `messages` table:
/// - id: BIGSERIAL PRIMARY KEY
/// - thread_id: BIGINT NOT NULL REFERENCES threads(id) ON DELETE CASCADE
/// - sender_id: BIGINT NOT NULL REFERENCES users(id)
/// - text: TEXT NOT NULL
/// - is_read: BOOLEAN NOT NULL DEFAULT FALSE
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
///
/// Messages are immutable once written; there is no update or delete
/// endpoint, and no endpoint ever flips `is_read` to true.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Primary key
    pub id: i64,

    /// Thread this message belongs to
    pub thread_id: i64,

    /// Sending participant's user id
    pub sender_id: i64,

    /// Message body (rich text stored verbatim)
    pub text: String,

    /// Read flag, false at creation
    pub is_read: bool,

    /// Timestamp when the message was sent
    pub created_at: DateTime<Utc>,
}

/// Repository trait for Message data access operations.
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// List a thread's messages in creation order (id as tiebreaker),
    /// with limit/offset pagination.
    async fn list_by_thread(
        &self,
        thread_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Message>, AppError>;

    /// List every message of a thread in creation order.
    async fn list_all_by_thread(&self, thread_id: i64) -> Result<Vec<Message>, AppError>;

    /// Total number of messages in the thread.
    async fn count_by_thread(&self, thread_id: i64) -> Result<i64, AppError>;

    /// The newest message of the thread, if any.
    async fn find_last_by_thread(&self, thread_id: i64) -> Result<Option<Message>, AppError>;

    /// Append a message and bump the thread's `updated_at`, atomically.
    async fn create(
        &self,
        thread_id: i64,
        sender_id: i64,
        text: &str,
    ) -> Result<Message, AppError>;

    /// Count unread messages addressed to the user: `is_read = false`,
    /// sent by someone else, in any thread the user participates in.
    async fn count_unread_for_user(&self, user_id: i64) -> Result<i64, AppError>;
}
