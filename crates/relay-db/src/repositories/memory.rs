//! In-memory implementation of MessageStore
//!
//! Keeps every message in a process-local vector. Used when the relay runs
//! with `STORE_BACKEND=memory` and by tests.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

use relay_core::entities::{ChatMessage, NewChatMessage};
use relay_core::traits::{MessageStore, RepoResult};
use relay_core::value_objects::SnowflakeGenerator;

/// Process-local message store
#[derive(Default)]
pub struct InMemoryMessageStore {
    messages: RwLock<Vec<ChatMessage>>,
    ids: Arc<SnowflakeGenerator>,
}

impl InMemoryMessageStore {
    pub fn new(ids: Arc<SnowflakeGenerator>) -> Self {
        Self {
            messages: RwLock::new(Vec::new()),
            ids,
        }
    }

    /// Number of stored messages
    pub fn len(&self) -> usize {
        self.messages.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.read().is_empty()
    }

    /// Copy of every stored message in append order
    pub fn all(&self) -> Vec<ChatMessage> {
        self.messages.read().clone()
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn append(&self, message: NewChatMessage) -> RepoResult<ChatMessage> {
        let message = message.into_message(self.ids.generate(), Utc::now());
        self.messages.write().push(message.clone());
        Ok(message)
    }

    async fn recent(&self, limit: usize) -> RepoResult<Vec<ChatMessage>> {
        let messages = self.messages.read();

        // Explicit timestamps may arrive out of order; sort a copy by (time, id)
        let mut ordered: Vec<&ChatMessage> = messages.iter().collect();
        ordered.sort_by_key(|m| (m.created_at, m.id));

        let skip = ordered.len().saturating_sub(limit);
        Ok(ordered.into_iter().skip(skip).cloned().collect())
    }
}

impl std::fmt::Debug for InMemoryMessageStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryMessageStore")
            .field("messages", &self.len())
            .finish()
    }
}
