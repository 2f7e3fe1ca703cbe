//! # Domain Entities
//!
//! Core domain entities representing the main business objects of the
//! messaging backend. All entities map directly to their corresponding
//! database tables.
//!
//! ## Entities
//!
//! - **User**: Account with login credential; referenced by threads and
//!   messages, never owned by them
//! - **Thread**: A conversation between exactly two users
//! - **Message**: A text message sent into a thread by a participant
//!
//! ## Repository Traits
//!
//! Each entity has an associated repository trait defining data access
//! operations. These traits are implemented in the infrastructure layer,
//! following the dependency inversion principle.

mod message;
mod thread;
mod user;

pub use message::{Message, MessageRepository};
pub use thread::{Thread, ThreadRepository, THREAD_PARTICIPANTS};
pub use user::{User, UserRepository};
