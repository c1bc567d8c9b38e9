//! Event broadcasting
//!
//! Fans serialized events out to a snapshot of the connection registry.

mod broadcaster;

pub use broadcaster::{BroadcastReport, Broadcaster};
