//! Gateway state
//!
//! Shared dependencies handed to every session.

use std::sync::Arc;

use relay_common::ChatConfig;
use relay_core::MessageStore;

use crate::broadcast::Broadcaster;
use crate::connection::ConnectionRegistry;

/// Gateway application state
///
/// Cheap to clone; every field is shared.
#[derive(Clone)]
pub struct GatewayState {
    registry: Arc<ConnectionRegistry>,
    broadcaster: Broadcaster,
    store: Arc<dyn MessageStore>,
    chat: Arc<ChatConfig>,
}

impl GatewayState {
    /// Create a gateway state with a fresh, empty registry
    pub fn new(store: Arc<dyn MessageStore>, chat: ChatConfig) -> Self {
        let registry = ConnectionRegistry::new_shared();
        Self {
            broadcaster: Broadcaster::new(registry.clone()),
            registry,
            store,
            chat: Arc::new(chat),
        }
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    pub fn broadcaster(&self) -> &Broadcaster {
        &self.broadcaster
    }

    pub fn store(&self) -> &dyn MessageStore {
        self.store.as_ref()
    }

    pub fn chat(&self) -> &ChatConfig {
        &self.chat
    }
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayState")
            .field("registry", &self.registry)
            .field("chat", &self.chat)
            .finish_non_exhaustive()
    }
}
