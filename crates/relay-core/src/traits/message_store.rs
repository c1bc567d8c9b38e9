//! Message store port
//!
//! The domain defines what it needs from persistence; `relay-db` provides
//! the PostgreSQL and in-memory implementations.

use async_trait::async_trait;

use crate::entities::{ChatMessage, NewChatMessage};
use crate::error::DomainError;

/// Result type for store operations
pub type RepoResult<T> = Result<T, DomainError>;

/// Append-only chat message persistence
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Persist a message, assigning its id and (if absent) its timestamp
    ///
    /// Fails with `DomainError::StoreUnavailable` when the backing store
    /// cannot be reached.
    async fn append(&self, message: NewChatMessage) -> RepoResult<ChatMessage>;

    /// Up to `limit` most recent messages, ordered oldest to newest
    ///
    /// An empty store yields an empty vector, not an error.
    async fn recent(&self, limit: usize) -> RepoResult<Vec<ChatMessage>>;
}
