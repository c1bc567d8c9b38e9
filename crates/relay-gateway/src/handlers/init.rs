//! Init handler
//!
//! Binds the display name, replays recent history to the new client, then
//! announces the join to everyone.

use std::sync::Arc;

use super::{HandlerError, HandlerResult};
use crate::connection::Connection;
use crate::protocol::ServerEvent;
use crate::server::GatewayState;

/// Handles `init` events
pub struct InitHandler;

impl InitHandler {
    /// Returns `true` if the name was bound by this call
    ///
    /// The name is bound only once the `history` frame is queued, so a client
    /// whose transport fails first stays unnamed on both the session and the
    /// connection. A history fetch failure is logged and the `history` frame
    /// skipped; the join is still announced.
    pub async fn handle(
        state: &GatewayState,
        connection: &Arc<Connection>,
        username: &str,
    ) -> HandlerResult<bool> {
        if connection.username().is_some() {
            tracing::debug!(
                connection_id = %connection.id(),
                username = %username,
                "Display name already bound"
            );
            return Ok(false);
        }

        match state.store().recent(state.chat().history_limit).await {
            Ok(messages) => {
                state
                    .broadcaster()
                    .send_to(connection, &ServerEvent::history(&messages))?;
                tracing::debug!(connection_id = %connection.id(), count = messages.len(), "History sent");
            }
            Err(e) => {
                tracing::warn!(
                    connection_id = %connection.id(),
                    error = %HandlerError::from(e),
                    "History unavailable"
                );
            }
        }

        if !state.registry().bind_name(connection.id(), username) {
            return Ok(false);
        }

        // Includes the joining client
        let report = state.broadcaster().broadcast(&ServerEvent::joined(username), None);

        tracing::info!(
            connection_id = %connection.id(),
            username = %username,
            recipients = report.delivered,
            "User joined"
        );

        Ok(true)
    }
}
