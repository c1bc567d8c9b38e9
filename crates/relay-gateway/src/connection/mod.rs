//! Connection management
//!
//! Live WebSocket connections and the registry that tracks them.

mod connection;
mod registry;

pub use connection::{Connection, ConnectionId, ConnectionState, DeliveryError};
pub use registry::ConnectionRegistry;
