//! Message Service
//!
//! Listing and appending messages inside a thread.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{Message, MessageRepository, ThreadRepository};

/// Message service trait
#[async_trait]
pub trait MessageService: Send + Sync {
    /// List a thread's messages in creation order, with the total count
    async fn list_messages(
        &self,
        thread_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<MessageDto>, i64), MessageError>;

    /// Append a message to a thread on behalf of the caller
    async fn send_message(
        &self,
        caller_id: i64,
        thread_id: i64,
        text: &str,
    ) -> Result<MessageDto, MessageError>;
}

/// Message data transfer object
#[derive(Debug, Clone)]
pub struct MessageDto {
    pub id: String,
    pub thread_id: String,
    pub sender_id: String,
    pub text: String,
    pub is_read: bool,
    pub created_at: String,
}

impl From<Message> for MessageDto {
    fn from(message: Message) -> Self {
        Self {
            id: message.id.to_string(),
            thread_id: message.thread_id.to_string(),
            sender_id: message.sender_id.to_string(),
            text: message.text,
            is_read: message.is_read,
            created_at: message.created_at.to_rfc3339(),
        }
    }
}

/// Message service errors
#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    #[error("Thread not found")]
    ThreadNotFound,

    #[error("You can't send a message to a thread you're not a participant of")]
    NotParticipant,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// MessageService implementation
///
/// The sender of every created message is the caller; a sender supplied
/// by the client never reaches this layer.
pub struct MessageServiceImpl<M, T>
where
    M: MessageRepository,
    T: ThreadRepository,
{
    message_repo: Arc<M>,
    thread_repo: Arc<T>,
}

impl<M, T> MessageServiceImpl<M, T>
where
    M: MessageRepository,
    T: ThreadRepository,
{
    pub fn new(message_repo: Arc<M>, thread_repo: Arc<T>) -> Self {
        Self {
            message_repo,
            thread_repo,
        }
    }
}

#[async_trait]
impl<M, T> MessageService for MessageServiceImpl<M, T>
where
    M: MessageRepository + 'static,
    T: ThreadRepository + 'static,
{
    async fn list_messages(
        &self,
        thread_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<MessageDto>, i64), MessageError> {
        let messages = self
            .message_repo
            .list_by_thread(thread_id, limit, offset)
            .await
            .map_err(|e| MessageError::Internal(e.to_string()))?;

        let count = self
            .message_repo
            .count_by_thread(thread_id)
            .await
            .map_err(|e| MessageError::Internal(e.to_string()))?;

        Ok((messages.into_iter().map(MessageDto::from).collect(), count))
    }

    async fn send_message(
        &self,
        caller_id: i64,
        thread_id: i64,
        text: &str,
    ) -> Result<MessageDto, MessageError> {
        let thread = self
            .thread_repo
            .find_by_id(thread_id)
            .await
            .map_err(|e| MessageError::Internal(e.to_string()))?
            .ok_or(MessageError::ThreadNotFound)?;

        if !thread.has_participant(caller_id) {
            return Err(MessageError::NotParticipant);
        }

        let created = self
            .message_repo
            .create(thread_id, caller_id, text)
            .await
            .map_err(|e| MessageError::Internal(e.to_string()))?;

        Ok(MessageDto::from(created))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::testing::{
        InMemoryMessageRepository, InMemoryStore, InMemoryThreadRepository,
        InMemoryUserRepository,
    };

    struct Fixture {
        service: MessageServiceImpl<InMemoryMessageRepository, InMemoryThreadRepository>,
        threads: Arc<InMemoryThreadRepository>,
        alice: i64,
        bob: i64,
        carol: i64,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(InMemoryStore::default());
        let users = InMemoryUserRepository::with_store(store.clone());
        let threads = Arc::new(InMemoryThreadRepository::with_store(store.clone()));
        let messages = Arc::new(InMemoryMessageRepository::with_store(store));

        let alice = users.insert("alice", "hash").id;
        let bob = users.insert("bob", "hash").id;
        let carol = users.insert("carol", "hash").id;

        Fixture {
            service: MessageServiceImpl::new(messages, threads.clone()),
            threads,
            alice,
            bob,
            carol,
        }
    }

    #[tokio::test]
    async fn test_sender_is_always_the_caller() {
        let f = fixture();
        let thread = f.threads.create(&[f.alice, f.bob]).await.unwrap();

        let message = f.service.send_message(f.alice, thread.id, "hi").await.unwrap();

        assert_eq!(message.sender_id, f.alice.to_string());
        assert_eq!(message.thread_id, thread.id.to_string());
        assert!(!message.is_read);
    }

    #[tokio::test]
    async fn test_non_participant_cannot_send() {
        let f = fixture();
        let thread = f.threads.create(&[f.alice, f.bob]).await.unwrap();

        let result = f.service.send_message(f.carol, thread.id, "hi").await;

        assert!(matches!(result, Err(MessageError::NotParticipant)));
    }

    #[tokio::test]
    async fn test_send_to_missing_thread() {
        let f = fixture();

        let result = f.service.send_message(f.alice, 999, "hi").await;

        assert!(matches!(result, Err(MessageError::ThreadNotFound)));
    }

    #[tokio::test]
    async fn test_sending_bumps_thread_updated_at() {
        let f = fixture();
        let thread = f.threads.create(&[f.alice, f.bob]).await.unwrap();
        let before = thread.updated_at;

        f.service.send_message(f.bob, thread.id, "hi").await.unwrap();

        let after = f.threads.find_by_id(thread.id).await.unwrap().unwrap();
        assert!(after.updated_at > before);
    }

    #[tokio::test]
    async fn test_listing_is_in_creation_order() {
        let f = fixture();
        let thread = f.threads.create(&[f.alice, f.bob]).await.unwrap();

        f.service.send_message(f.alice, thread.id, "first").await.unwrap();
        f.service.send_message(f.bob, thread.id, "second").await.unwrap();
        f.service.send_message(f.alice, thread.id, "third").await.unwrap();

        let (messages, count) = f.service.list_messages(thread.id, 10, 0).await.unwrap();

        assert_eq!(count, 3);
        let texts: Vec<&str> = messages.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_listing_respects_limit_and_offset() {
        let f = fixture();
        let thread = f.threads.create(&[f.alice, f.bob]).await.unwrap();
        for text in ["a", "b", "c"] {
            f.service.send_message(f.alice, thread.id, text).await.unwrap();
        }

        let (messages, count) = f.service.list_messages(thread.id, 2, 1).await.unwrap();

        assert_eq!(count, 3);
        let texts: Vec<&str> = messages.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["b", "c"]);
    }
}
