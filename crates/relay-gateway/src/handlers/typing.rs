//! Typing indicator handler

use std::sync::Arc;

use crate::connection::Connection;
use crate::protocol::ServerEvent;
use crate::server::GatewayState;

/// Handles `typing` events
pub struct TypingHandler;

impl TypingHandler {
    /// Relay the indicator to everyone except the typist
    pub fn handle(state: &GatewayState, connection: &Arc<Connection>, username: &str) {
        state
            .broadcaster()
            .broadcast(&ServerEvent::typing(username), Some(connection.id()));
    }
}
