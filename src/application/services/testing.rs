//! In-memory repository fakes for service tests.
//!
//! All three fakes share one [`InMemoryStore`] so cross-entity behavior
//! (cascade deletes, `updated_at` bumps, unread counts) matches the SQL
//! implementations.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{
    Message, MessageRepository, Thread, ThreadRepository, User, UserRepository,
};
use crate::shared::error::AppError;

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    threads: Vec<Thread>,
    messages: Vec<Message>,
    next_user_id: i64,
    next_thread_id: i64,
    next_message_id: i64,
}

/// Backing store shared by the repository fakes.
#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<Inner>,
}

/// In-memory UserRepository fake.
pub struct InMemoryUserRepository {
    store: Arc<InMemoryStore>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::with_store(Arc::new(InMemoryStore::default()))
    }

    pub fn with_store(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }

    /// Seed a user and return it.
    pub fn insert(&self, username: &str, password_hash: &str) -> User {
        let mut inner = self.store.inner.lock().unwrap();
        inner.next_user_id += 1;
        let now = Utc::now();
        let user = User {
            id: inner.next_user_id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
            updated_at: now,
        };
        inner.users.push(user.clone());
        user
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let inner = self.store.inner.lock().unwrap();
        Ok(inner.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let inner = self.store.inner.lock().unwrap();
        Ok(inner.users.iter().find(|u| u.username == username).cloned())
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<User>, AppError> {
        let inner = self.store.inner.lock().unwrap();
        let mut users = inner.users.clone();
        users.sort_by_key(|u| u.id);
        Ok(users
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn count(&self) -> Result<i64, AppError> {
        let inner = self.store.inner.lock().unwrap();
        Ok(inner.users.len() as i64)
    }
}

/// In-memory ThreadRepository fake.
pub struct InMemoryThreadRepository {
    store: Arc<InMemoryStore>,
}

impl InMemoryThreadRepository {
    pub fn with_store(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ThreadRepository for InMemoryThreadRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Thread>, AppError> {
        let inner = self.store.inner.lock().unwrap();
        Ok(inner.threads.iter().find(|t| t.id == id).cloned())
    }

    async fn find_by_participant_pair(
        &self,
        user_a: i64,
        user_b: i64,
    ) -> Result<Option<Thread>, AppError> {
        let inner = self.store.inner.lock().unwrap();
        Ok(inner
            .threads
            .iter()
            .filter(|t| t.has_participant(user_a) && t.has_participant(user_b))
            .min_by_key(|t| t.id)
            .cloned())
    }

    async fn list_for_user(
        &self,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Thread>, AppError> {
        let inner = self.store.inner.lock().unwrap();
        let mut threads: Vec<Thread> = inner
            .threads
            .iter()
            .filter(|t| t.has_participant(user_id))
            .cloned()
            .collect();
        threads.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(b.id.cmp(&a.id)));
        Ok(threads
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn count_for_user(&self, user_id: i64) -> Result<i64, AppError> {
        let inner = self.store.inner.lock().unwrap();
        Ok(inner
            .threads
            .iter()
            .filter(|t| t.has_participant(user_id))
            .count() as i64)
    }

    async fn create(&self, participant_ids: &[i64]) -> Result<Thread, AppError> {
        let mut inner = self.store.inner.lock().unwrap();
        inner.next_thread_id += 1;
        let now = Utc::now();
        let mut ids = participant_ids.to_vec();
        ids.sort_unstable();
        let thread = Thread {
            id: inner.next_thread_id,
            participant_ids: ids,
            created_at: now,
            updated_at: now,
        };
        inner.threads.push(thread.clone());
        Ok(thread)
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let mut inner = self.store.inner.lock().unwrap();
        if !inner.threads.iter().any(|t| t.id == id) {
            return Err(AppError::NotFound(format!("Thread {} not found", id)));
        }
        inner.threads.retain(|t| t.id != id);
        inner.messages.retain(|m| m.thread_id != id);
        Ok(())
    }
}

/// In-memory MessageRepository fake.
pub struct InMemoryMessageRepository {
    store: Arc<InMemoryStore>,
}

impl InMemoryMessageRepository {
    pub fn with_store(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn list_by_thread(
        &self,
        thread_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Message>, AppError> {
        let all = self.list_all_by_thread(thread_id).await?;
        Ok(all
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn list_all_by_thread(&self, thread_id: i64) -> Result<Vec<Message>, AppError> {
        let inner = self.store.inner.lock().unwrap();
        let mut messages: Vec<Message> = inner
            .messages
            .iter()
            .filter(|m| m.thread_id == thread_id)
            .cloned()
            .collect();
        messages.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(messages)
    }

    async fn count_by_thread(&self, thread_id: i64) -> Result<i64, AppError> {
        let inner = self.store.inner.lock().unwrap();
        Ok(inner
            .messages
            .iter()
            .filter(|m| m.thread_id == thread_id)
            .count() as i64)
    }

    async fn find_last_by_thread(&self, thread_id: i64) -> Result<Option<Message>, AppError> {
        let all = self.list_all_by_thread(thread_id).await?;
        Ok(all.into_iter().last())
    }

    async fn create(
        &self,
        thread_id: i64,
        sender_id: i64,
        text: &str,
    ) -> Result<Message, AppError> {
        let mut inner = self.store.inner.lock().unwrap();
        inner.next_message_id += 1;
        let now = Utc::now();
        let message = Message {
            id: inner.next_message_id,
            thread_id,
            sender_id,
            text: text.to_string(),
            is_read: false,
            created_at: now,
        };
        inner.messages.push(message.clone());
        if let Some(thread) = inner.threads.iter_mut().find(|t| t.id == thread_id) {
            thread.updated_at = now;
        }
        Ok(message)
    }

    async fn count_unread_for_user(&self, user_id: i64) -> Result<i64, AppError> {
        let inner = self.store.inner.lock().unwrap();
        let thread_ids: Vec<i64> = inner
            .threads
            .iter()
            .filter(|t| t.has_participant(user_id))
            .map(|t| t.id)
            .collect();
        Ok(inner
            .messages
            .iter()
            .filter(|m| !m.is_read && m.sender_id != user_id && thread_ids.contains(&m.thread_id))
            .count() as i64)
    }
}
