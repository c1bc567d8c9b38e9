//! Individual WebSocket connection
//!
//! Represents a single live connection: its identity, its display name, its
//! readiness, and the queue feeding its socket writer.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::Notify;
use uuid::Uuid;

use crate::protocol::Frame;

/// Opaque handle, unique per live connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Connection readiness
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Accepting writes
    Open,
    /// Shutting down, either by the session or after a fatal write; no new writes
    Closing,
    Closed,
}

/// Why a frame could not be queued for a recipient
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    #[error("connection is not open")]
    Closed,
    #[error("outbound queue is full")]
    QueueFull,
}

/// A single WebSocket connection
pub struct Connection {
    id: ConnectionId,

    /// Display name, unset until `init`; the first bind wins
    username: RwLock<Option<String>>,

    state: RwLock<ConnectionState>,

    /// Queue drained by the socket writer task
    sender: mpsc::Sender<Frame>,

    /// Wakes the socket loop when the connection is shut down from outside it
    shutdown: Notify,

    created_at: Instant,
}

impl Connection {
    pub fn new(id: ConnectionId, sender: mpsc::Sender<Frame>) -> Arc<Self> {
        Arc::new(Self {
            id,
            username: RwLock::new(None),
            state: RwLock::new(ConnectionState::Open),
            sender,
            shutdown: Notify::new(),
            created_at: Instant::now(),
        })
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn username(&self) -> Option<String> {
        self.username.read().clone()
    }

    /// Bind the display name; returns `false` if one was already bound
    pub fn bind_username(&self, name: &str) -> bool {
        let mut slot = self.username.write();
        if slot.is_some() {
            return false;
        }
        *slot = Some(name.to_string());
        true
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.read()
    }

    pub fn set_state(&self, state: ConnectionState) {
        *self.state.write() = state;
    }

    /// Whether the connection currently accepts writes
    pub fn is_open(&self) -> bool {
        self.state() == ConnectionState::Open && !self.sender.is_closed()
    }

    /// Queue a frame for the socket writer without waiting
    ///
    /// A full queue is a fatal write error: the connection stops accepting
    /// frames and its socket loop is told to shut down, so a slow reader is
    /// disconnected instead of silently missing frames.
    pub fn deliver(&self, frame: Frame) -> Result<(), DeliveryError> {
        if self.state() != ConnectionState::Open {
            return Err(DeliveryError::Closed);
        }

        match self.sender.try_send(frame) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                self.shut_down();
                Err(DeliveryError::QueueFull)
            }
            Err(TrySendError::Closed(_)) => Err(DeliveryError::Closed),
        }
    }

    /// Stop accepting writes and wake whoever awaits `shutdown_requested`
    ///
    /// Only the transition out of `Open` notifies.
    pub fn shut_down(&self) {
        {
            let mut state = self.state.write();
            if *state != ConnectionState::Open {
                return;
            }
            *state = ConnectionState::Closing;
        }
        self.shutdown.notify_one();
    }

    /// Resolves once `shut_down` has been called
    pub async fn shutdown_requested(&self) {
        self.shutdown.notified().await;
    }

    pub fn age(&self) -> std::time::Duration {
        self.created_at.elapsed()
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("username", &*self.username.read())
            .field("state", &self.state())
            .finish()
    }
}
