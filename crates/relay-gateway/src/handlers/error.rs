//! Handler error types

use relay_core::DomainError;
use thiserror::Error;

use crate::connection::{ConnectionId, DeliveryError};

/// Handler error type
///
/// Every variant is contained to the operation that raised it; none of them
/// ends another session or the process.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Frame could not be decoded into a client event
    #[error("Malformed event: {0}")]
    MalformedEvent(String),

    /// Persistence failed
    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[source] DomainError),

    /// A frame could not be queued for one recipient
    #[error("Delivery to {connection_id} failed: {reason}")]
    DeliveryFailure {
        connection_id: ConnectionId,
        reason: DeliveryError,
    },

    /// The session's own transport is gone
    #[error("Transport closed")]
    TransportClosed,
}

impl HandlerError {
    /// Whether this is a normal terminal condition rather than a failure
    pub fn is_expected(&self) -> bool {
        matches!(self, Self::TransportClosed)
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(e: serde_json::Error) -> Self {
        Self::MalformedEvent(e.to_string())
    }
}

impl From<DomainError> for HandlerError {
    fn from(e: DomainError) -> Self {
        Self::StoreUnavailable(e)
    }
}

/// Handler result type
pub type HandlerResult<T> = Result<T, HandlerError>;
