//! Repository Implementations
//!
//! PostgreSQL implementations of the domain repository traits.
//!
//! ## Available Repositories
//!
//! - **PgUserRepository** - User lookups and directory listing
//! - **PgThreadRepository** - Thread CRUD with participant aggregation
//! - **PgMessageRepository** - Message listing/creation and unread counts

pub mod message_repository;
pub mod thread_repository;
pub mod user_repository;

pub use message_repository::PgMessageRepository;
pub use thread_repository::PgThreadRepository;
pub use user_repository::PgUserRepository;
