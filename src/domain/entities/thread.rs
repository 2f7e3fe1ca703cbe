//! Thread entity and repository trait.
//!
//! Maps to the `threads` table plus the `thread_participants` junction
//! table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Number of participants every thread has.
pub const THREAD_PARTICIPANTS: usize = 2;

/// Represents a two-party conversation.
///
/// Maps to the `threads` table:
/// - id: BIGSERIAL PRIMARY KEY
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// - updated_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
///
/// Membership lives in `thread_participants(thread_id, user_id)`, exactly
/// two rows per thread. `updated_at` is bumped whenever a message is
/// appended, so listing by `updated_at DESC` orders threads by recency
/// of conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thread {
    /// Primary key
    pub id: i64,

    /// User ids of the two participants
    pub participant_ids: Vec<i64>,

    /// Thread creation timestamp
    pub created_at: DateTime<Utc>,

    /// Timestamp of the most recent message (or creation, if none)
    pub updated_at: DateTime<Utc>,
}

impl Thread {
    /// Check whether a user is one of the thread's participants.
    pub fn has_participant(&self, user_id: i64) -> bool {
        self.participant_ids.contains(&user_id)
    }
}

/// Repository trait for Thread data access operations.
///
/// Pair uniqueness is NOT enforced by a database constraint; callers use
/// [`ThreadRepository::find_by_participant_pair`] before creating, which
/// leaves a window for concurrent duplicate creation. Accepted at this
/// contention level.
#[async_trait]
pub trait ThreadRepository: Send + Sync {
    /// Find a thread by its ID, with participants loaded.
    async fn find_by_id(&self, id: i64) -> Result<Option<Thread>, AppError>;

    /// Find the thread containing both users, if one exists.
    ///
    /// The pair is unordered: `(a, b)` and `(b, a)` resolve to the same
    /// thread. When duplicates exist the lowest id wins.
    async fn find_by_participant_pair(
        &self,
        user_a: i64,
        user_b: i64,
    ) -> Result<Option<Thread>, AppError>;

    /// List threads the user participates in, most recently updated
    /// first, with limit/offset pagination.
    async fn list_for_user(
        &self,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Thread>, AppError>;

    /// Total number of threads the user participates in.
    async fn count_for_user(&self, user_id: i64) -> Result<i64, AppError>;

    /// Create a thread and attach the given participants.
    async fn create(&self, participant_ids: &[i64]) -> Result<Thread, AppError>;

    /// Delete a thread together with its participant rows and messages.
    ///
    /// Returns `AppError::NotFound` if no thread has this id.
    async fn delete(&self, id: i64) -> Result<(), AppError>;
}
