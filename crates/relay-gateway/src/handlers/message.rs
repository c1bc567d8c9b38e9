//! Chat message handler

use std::sync::Arc;

use relay_core::NewChatMessage;

use super::HandlerResult;
use crate::connection::Connection;
use crate::protocol::ServerEvent;
use crate::server::GatewayState;

/// Handles `message` events
pub struct ChatMessageHandler;

impl ChatMessageHandler {
    /// Persist the message, then broadcast the stored record to everyone
    ///
    /// Nothing is broadcast if the store rejects the message.
    pub async fn handle(
        state: &GatewayState,
        connection: &Arc<Connection>,
        username: Option<&str>,
        text: String,
    ) -> HandlerResult<()> {
        let stored = state
            .store()
            .append(NewChatMessage::new(username.map(String::from), text))
            .await?;

        let report = state.broadcaster().broadcast(&ServerEvent::message(&stored), None);

        tracing::debug!(
            connection_id = %connection.id(),
            message_id = %stored.id,
            recipients = report.delivered,
            "Message relayed"
        );

        Ok(())
    }
}
