//! User Service
//!
//! The user directory with per-user unread counts.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{MessageRepository, UserRepository};

/// User service trait
#[async_trait]
pub trait UserService: Send + Sync {
    /// List all users ordered by id, each with its unread-message count,
    /// plus the total number of users
    async fn list_users(&self, limit: i64, offset: i64)
        -> Result<(Vec<UserDto>, i64), UserError>;
}

/// User data transfer object
#[derive(Debug, Clone)]
pub struct UserDto {
    pub id: String,
    pub username: String,
    pub unread_messages: i64,
}

/// User service errors
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("Internal error: {0}")]
    Internal(String),
}

/// UserService implementation
///
/// Unread counts are computed per request, one count query per listed
/// user, never cached.
pub struct UserServiceImpl<U, M>
where
    U: UserRepository,
    M: MessageRepository,
{
    user_repo: Arc<U>,
    message_repo: Arc<M>,
}

impl<U, M> UserServiceImpl<U, M>
where
    U: UserRepository,
    M: MessageRepository,
{
    pub fn new(user_repo: Arc<U>, message_repo: Arc<M>) -> Self {
        Self {
            user_repo,
            message_repo,
        }
    }
}

#[async_trait]
impl<U, M> UserService for UserServiceImpl<U, M>
where
    U: UserRepository + 'static,
    M: MessageRepository + 'static,
{
    async fn list_users(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<UserDto>, i64), UserError> {
        let users = self
            .user_repo
            .list(limit, offset)
            .await
            .map_err(|e| UserError::Internal(e.to_string()))?;

        let count = self
            .user_repo
            .count()
            .await
            .map_err(|e| UserError::Internal(e.to_string()))?;

        let mut dtos = Vec::with_capacity(users.len());
        for user in users {
            let unread_messages = self
                .message_repo
                .count_unread_for_user(user.id)
                .await
                .map_err(|e| UserError::Internal(e.to_string()))?;

            dtos.push(UserDto {
                id: user.id.to_string(),
                username: user.username,
                unread_messages,
            });
        }

        Ok((dtos, count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::testing::{
        InMemoryMessageRepository, InMemoryStore, InMemoryThreadRepository,
        InMemoryUserRepository,
    };
    use crate::domain::entities::ThreadRepository;

    struct Fixture {
        service: UserServiceImpl<InMemoryUserRepository, InMemoryMessageRepository>,
        threads: Arc<InMemoryThreadRepository>,
        messages: Arc<InMemoryMessageRepository>,
        alice: i64,
        bob: i64,
        carol: i64,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(InMemoryStore::default());
        let users = Arc::new(InMemoryUserRepository::with_store(store.clone()));
        let threads = Arc::new(InMemoryThreadRepository::with_store(store.clone()));
        let messages = Arc::new(InMemoryMessageRepository::with_store(store));

        let alice = users.insert("alice", "hash").id;
        let bob = users.insert("bob", "hash").id;
        let carol = users.insert("carol", "hash").id;

        Fixture {
            service: UserServiceImpl::new(users, messages.clone()),
            threads,
            messages,
            alice,
            bob,
            carol,
        }
    }

    async fn unread(f: &Fixture, user_id: i64) -> i64 {
        let (users, _) = f.service.list_users(100, 0).await.unwrap();
        users
            .iter()
            .find(|u| u.id == user_id.to_string())
            .unwrap()
            .unread_messages
    }

    #[tokio::test]
    async fn test_listing_includes_every_user() {
        let f = fixture();

        let (users, count) = f.service.list_users(10, 0).await.unwrap();

        assert_eq!(count, 3);
        let names: Vec<&str> = users.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, vec!["alice", "bob", "carol"]);
    }

    #[tokio::test]
    async fn test_unread_counts_start_at_zero() {
        let f = fixture();

        assert_eq!(unread(&f, f.alice).await, 0);
        assert_eq!(unread(&f, f.bob).await, 0);
    }

    #[tokio::test]
    async fn test_sending_increments_recipient_only() {
        let f = fixture();
        let thread = f.threads.create(&[f.alice, f.bob]).await.unwrap();

        f.messages.create(thread.id, f.alice, "hi bob").await.unwrap();

        assert_eq!(unread(&f, f.bob).await, 1);
        assert_eq!(unread(&f, f.alice).await, 0);
        assert_eq!(unread(&f, f.carol).await, 0);
    }

    #[tokio::test]
    async fn test_unread_counts_span_threads() {
        let f = fixture();
        let ab = f.threads.create(&[f.alice, f.bob]).await.unwrap();
        let ac = f.threads.create(&[f.alice, f.carol]).await.unwrap();

        f.messages.create(ab.id, f.bob, "one").await.unwrap();
        f.messages.create(ab.id, f.bob, "two").await.unwrap();
        f.messages.create(ac.id, f.carol, "three").await.unwrap();

        // Alice is the recipient in both threads; the senders see nothing.
        assert_eq!(unread(&f, f.alice).await, 3);
        assert_eq!(unread(&f, f.bob).await, 0);
        assert_eq!(unread(&f, f.carol).await, 0);
    }

    #[tokio::test]
    async fn test_listing_paginates() {
        let f = fixture();

        let (users, count) = f.service.list_users(2, 2).await.unwrap();

        assert_eq!(count, 3);
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].username, "carol");
    }
}
