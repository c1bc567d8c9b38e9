//! Per-connection session state machine
//!
//! `Unnamed` -> `Named` on the first `init`, and any phase -> `Closed` when
//! the transport goes away. Inbound frames are handled one at a time in
//! arrival order by the connection's reader loop.

use std::sync::Arc;

use super::{ChatMessageHandler, HandlerError, HandlerResult, InitHandler, TypingHandler};
use crate::connection::{Connection, ConnectionState};
use crate::protocol::{ClientEvent, ServerEvent};
use crate::server::GatewayState;

/// Where a session is in its lifecycle
///
/// Until `Closed`, the phase is `Named` exactly when the connection has a
/// bound display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionPhase {
    /// Accepted, no display name yet
    Unnamed,
    /// Display name bound by `init`
    Named(String),
    /// Terminal
    Closed,
}

/// One chat session, bound to one connection
pub struct Session {
    state: GatewayState,
    connection: Arc<Connection>,
    phase: SessionPhase,
}

impl Session {
    /// Start a session and register its connection
    pub fn open(state: GatewayState, connection: Arc<Connection>) -> Self {
        state.registry().register(connection.clone());
        tracing::info!(connection_id = %connection.id(), "Session opened");

        Self {
            state,
            connection,
            phase: SessionPhase::Unnamed,
        }
    }

    pub fn connection(&self) -> &Arc<Connection> {
        &self.connection
    }

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn username(&self) -> Option<&str> {
        match &self.phase {
            SessionPhase::Named(name) => Some(name),
            _ => None,
        }
    }

    /// Decode and handle one inbound text frame
    ///
    /// Malformed frames leave the session untouched.
    pub async fn handle_text(&mut self, text: &str) -> HandlerResult<()> {
        if self.phase == SessionPhase::Closed {
            return Err(HandlerError::TransportClosed);
        }

        let event = ClientEvent::from_json(text)?;
        self.handle_event(event).await
    }

    /// Apply one decoded client event
    pub async fn handle_event(&mut self, event: ClientEvent) -> HandlerResult<()> {
        tracing::trace!(connection_id = %self.connection.id(), kind = event.kind(), "Client event");

        if self.phase == SessionPhase::Closed {
            return Err(HandlerError::TransportClosed);
        }

        match event {
            ClientEvent::Init { username } => self.init(username).await,
            ClientEvent::Message { message } => {
                ChatMessageHandler::handle(&self.state, &self.connection, self.username(), message)
                    .await
            }
            ClientEvent::Typing => {
                match self.username() {
                    Some(name) => TypingHandler::handle(&self.state, &self.connection, name),
                    None => {
                        tracing::debug!(connection_id = %self.connection.id(), "Typing before init ignored");
                    }
                }
                Ok(())
            }
        }
    }

    async fn init(&mut self, username: String) -> HandlerResult<()> {
        if let Some(current) = self.username() {
            tracing::debug!(
                connection_id = %self.connection.id(),
                username = %current,
                ignored = %username,
                "Repeated init ignored"
            );
            return Ok(());
        }

        if InitHandler::handle(&self.state, &self.connection, &username).await? {
            self.phase = SessionPhase::Named(username);
        }
        Ok(())
    }

    /// Tear the session down
    ///
    /// Safe to call any number of times; only the call that actually removes
    /// the connection from the registry announces the departure.
    pub fn close(&mut self) {
        if self.phase == SessionPhase::Closed {
            return;
        }

        let phase = std::mem::replace(&mut self.phase, SessionPhase::Closed);
        let id = self.connection.id();

        self.connection.set_state(ConnectionState::Closing);
        let removed = self.state.registry().unregister(id).is_some();
        self.connection.set_state(ConnectionState::Closed);

        if let (true, SessionPhase::Named(name)) = (removed, phase) {
            let report = self.state.broadcaster().broadcast(&ServerEvent::left(&name), None);
            tracing::info!(
                connection_id = %id,
                username = %name,
                recipients = report.delivered,
                "User left"
            );
        }

        tracing::info!(connection_id = %id, age = ?self.connection.age(), "Session closed");
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("connection", &self.connection)
            .field("phase", &self.phase)
            .finish()
    }
}
