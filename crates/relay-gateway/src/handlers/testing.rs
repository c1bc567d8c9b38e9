//! In-process session harness for handler tests

use std::sync::Arc;

use async_trait::async_trait;
use relay_common::ChatConfig;
use relay_core::{ChatMessage, DomainError, MessageStore, NewChatMessage, RepoResult};
use relay_db::InMemoryMessageStore;
use tokio::sync::mpsc;

use super::{HandlerResult, Session};
use crate::connection::{Connection, ConnectionId};
use crate::protocol::{Frame, ServerEvent};
use crate::server::GatewayState;

/// Store whose backend is always down
pub(crate) struct FailingStore;

#[async_trait]
impl MessageStore for FailingStore {
    async fn append(&self, _message: NewChatMessage) -> RepoResult<ChatMessage> {
        Err(DomainError::unavailable("connection refused"))
    }

    async fn recent(&self, _limit: usize) -> RepoResult<Vec<ChatMessage>> {
        Err(DomainError::unavailable("connection refused"))
    }
}

pub(crate) fn memory_state() -> (GatewayState, Arc<InMemoryMessageStore>) {
    let store = Arc::new(InMemoryMessageStore::default());
    let state = GatewayState::new(store.clone(), ChatConfig::default());
    (state, store)
}

pub(crate) fn failing_state() -> GatewayState {
    GatewayState::new(Arc::new(FailingStore), ChatConfig::default())
}

/// A session plus the receiving end of its outbound queue
pub(crate) struct Client {
    pub session: Session,
    pub rx: mpsc::Receiver<Frame>,
}

impl Client {
    pub fn connect(state: &GatewayState) -> Self {
        Self::connect_with_capacity(state, 64)
    }

    /// Connect with an outbound queue of `capacity` frames
    pub fn connect_with_capacity(state: &GatewayState, capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity);
        let connection = Connection::new(ConnectionId::generate(), tx);
        Self {
            session: Session::open(state.clone(), connection),
            rx,
        }
    }

    pub async fn named(state: &GatewayState, name: &str) -> Self {
        let mut client = Self::connect(state);
        client.init(name).await.unwrap();
        client
    }

    pub fn id(&self) -> ConnectionId {
        self.session.connection().id()
    }

    pub async fn send(&mut self, text: &str) -> HandlerResult<()> {
        self.session.handle_text(text).await
    }

    pub async fn init(&mut self, name: &str) -> HandlerResult<()> {
        self.send(&format!(r#"{{"type":"init","username":"{name}"}}"#)).await
    }

    pub async fn say(&mut self, text: &str) -> HandlerResult<()> {
        self.send(&format!(r#"{{"type":"message","message":"{text}"}}"#)).await
    }

    /// Every event queued so far
    pub fn drain(&mut self) -> Vec<ServerEvent> {
        let mut events = Vec::new();
        while let Ok(frame) = self.rx.try_recv() {
            events.push(ServerEvent::from_json(&frame).unwrap());
        }
        events
    }
}

/// Text of a `system` event
pub(crate) fn system_text(event: &ServerEvent) -> Option<&str> {
    match event {
        ServerEvent::System { message, .. } => Some(message),
        _ => None,
    }
}
