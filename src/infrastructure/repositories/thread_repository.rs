//! Thread Repository Implementation
//!
//! PostgreSQL implementation of thread operations. Participants live in
//! the `thread_participants` junction table and are aggregated into each
//! returned row.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{Thread, ThreadRepository};
use crate::shared::error::AppError;

/// PostgreSQL thread repository implementation.
pub struct PgThreadRepository {
    pool: PgPool,
}

impl PgThreadRepository {
    /// Creates a new PgThreadRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Internal row type for thread queries with aggregated participants.
#[derive(Debug, sqlx::FromRow)]
struct ThreadRow {
    id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    participant_ids: Vec<i64>,
}

impl ThreadRow {
    fn into_thread(self) -> Thread {
        Thread {
            id: self.id,
            participant_ids: self.participant_ids,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[async_trait]
impl ThreadRepository for PgThreadRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Thread>, AppError> {
        let row = sqlx::query_as::<_, ThreadRow>(
            r#"
            SELECT t.id, t.created_at, t.updated_at,
                   array_agg(tp.user_id ORDER BY tp.user_id) AS participant_ids
            FROM threads t
            JOIN thread_participants tp ON tp.thread_id = t.id
            WHERE t.id = $1
            GROUP BY t.id
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_thread()))
    }

    async fn find_by_participant_pair(
        &self,
        user_a: i64,
        user_b: i64,
    ) -> Result<Option<Thread>, AppError> {
        // Lowest id wins if a race ever produced duplicates for the pair.
        let row = sqlx::query_as::<_, ThreadRow>(
            r#"
            SELECT t.id, t.created_at, t.updated_at,
                   array_agg(tp.user_id ORDER BY tp.user_id) AS participant_ids
            FROM threads t
            JOIN thread_participants tp ON tp.thread_id = t.id
            WHERE t.id IN (
                SELECT thread_id FROM thread_participants WHERE user_id = $1
                INTERSECT
                SELECT thread_id FROM thread_participants WHERE user_id = $2
            )
            GROUP BY t.id
            ORDER BY t.id
            LIMIT 1
            "#,
        )
        .bind(user_a)
        .bind(user_b)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_thread()))
    }

    async fn list_for_user(
        &self,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Thread>, AppError> {
        let rows = sqlx::query_as::<_, ThreadRow>(
            r#"
            SELECT t.id, t.created_at, t.updated_at,
                   array_agg(tp.user_id ORDER BY tp.user_id) AS participant_ids
            FROM threads t
            JOIN thread_participants tp ON tp.thread_id = t.id
            WHERE t.id IN (
                SELECT thread_id FROM thread_participants WHERE user_id = $1
            )
            GROUP BY t.id
            ORDER BY t.updated_at DESC, t.id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_thread()).collect())
    }

    async fn count_for_user(&self, user_id: i64) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM thread_participants WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn create(&self, participant_ids: &[i64]) -> Result<Thread, AppError> {
        let mut tx = self.pool.begin().await?;

        let (id, created_at, updated_at) = sqlx::query_as::<_, (i64, DateTime<Utc>, DateTime<Utc>)>(
            r#"
            INSERT INTO threads DEFAULT VALUES
            RETURNING id, created_at, updated_at
            "#,
        )
        .fetch_one(&mut *tx)
        .await?;

        for &user_id in participant_ids {
            sqlx::query("INSERT INTO thread_participants (thread_id, user_id) VALUES ($1, $2)")
                .bind(id)
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        let mut ids = participant_ids.to_vec();
        ids.sort_unstable();

        Ok(Thread {
            id,
            participant_ids: ids,
            created_at,
            updated_at,
        })
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        // Messages and participant rows are removed alongside the thread
        // in one transaction; the schema's ON DELETE CASCADE backstops
        // any path that bypasses this method.
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM messages WHERE thread_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM thread_participants WHERE thread_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM threads WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Thread {} not found", id)));
        }

        tx.commit().await?;

        Ok(())
    }
}
