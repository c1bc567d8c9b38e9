//! Broadcaster
//!
//! Serializes an event once and queues the frame on every open connection
//! in a registry snapshot. Per-recipient failures are logged and counted;
//! they never reach the caller. A recipient whose queue overflows is shut
//! down by `Connection::deliver` and skipped from then on.

use std::sync::Arc;

use crate::connection::{Connection, ConnectionId, ConnectionRegistry, DeliveryError};
use crate::handlers::{HandlerError, HandlerResult};
use crate::protocol::ServerEvent;

/// Outcome of one broadcast
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Frames queued
    pub delivered: usize,
    /// Recipients skipped because they were excluded or not open
    pub skipped: usize,
    /// Recipients whose queue rejected the frame; each is now shutting down
    pub failed: usize,
}

/// Fans server events out to registered connections
#[derive(Clone)]
pub struct Broadcaster {
    registry: Arc<ConnectionRegistry>,
}

impl Broadcaster {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Deliver `event` to every open connection except `exclude`
    ///
    /// Frames are queued without waiting, so successive broadcasts from one
    /// caller reach each recipient in call order.
    pub fn broadcast(&self, event: &ServerEvent, exclude: Option<ConnectionId>) -> BroadcastReport {
        let mut report = BroadcastReport::default();

        let frame = match event.to_frame() {
            Ok(frame) => frame,
            Err(e) => {
                tracing::error!(kind = event.kind(), error = %e, "Failed to serialize event");
                return report;
            }
        };

        for conn in self.registry.snapshot() {
            if Some(conn.id()) == exclude || !conn.is_open() {
                report.skipped += 1;
                continue;
            }

            match conn.deliver(frame.clone()) {
                Ok(()) => report.delivered += 1,
                Err(reason) => {
                    report.failed += 1;
                    tracing::warn!(
                        connection_id = %conn.id(),
                        kind = event.kind(),
                        error = %HandlerError::DeliveryFailure { connection_id: conn.id(), reason },
                        "Broadcast delivery failed"
                    );
                }
            }
        }

        tracing::debug!(
            kind = event.kind(),
            delivered = report.delivered,
            skipped = report.skipped,
            failed = report.failed,
            "Event broadcast"
        );

        report
    }

    /// Deliver `event` to a single connection
    pub fn send_to(&self, connection: &Connection, event: &ServerEvent) -> HandlerResult<()> {
        let frame = event.to_frame()?;

        connection.deliver(frame).map_err(|reason| match reason {
            DeliveryError::Closed => HandlerError::TransportClosed,
            DeliveryError::QueueFull => HandlerError::DeliveryFailure {
                connection_id: connection.id(),
                reason,
            },
        })
    }
}

impl std::fmt::Debug for Broadcaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Broadcaster")
            .field("registry", &self.registry)
            .finish()
    }
}
