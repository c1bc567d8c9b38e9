//! # relay-db
//!
//! Storage layer implementing the `MessageStore` port.
//!
//! ## Overview
//!
//! - Connection pool management for PostgreSQL via SQLx
//! - `chat_messages` table model and entity mapping
//! - `PgMessageStore`, the durable store
//! - `InMemoryMessageStore`, a process-local store for development and tests
//!
//! ## Usage
//!
//! ```rust,ignore
//! use relay_db::{create_pool, ensure_schema, PgMessageStore, PoolConfig};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&PoolConfig::from_env()).await?;
//!     ensure_schema(&pool).await?;
//!     let store = PgMessageStore::new(pool, Default::default());
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, ensure_schema, PgPool, PoolConfig};
pub use repositories::{InMemoryMessageStore, PgMessageStore};
