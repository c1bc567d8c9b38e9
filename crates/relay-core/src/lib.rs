//! # relay-core
//!
//! Domain layer for the chat relay: the persisted chat message, its identifier,
//! domain errors, and the `MessageStore` port implemented by the storage layer.
//! This crate has no dependency on the web framework or the database driver.

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{ChatMessage, NewChatMessage};
pub use error::DomainError;
pub use traits::{MessageStore, RepoResult};
pub use value_objects::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
