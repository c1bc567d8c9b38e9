//! # relay-gateway
//!
//! WebSocket gateway for the broadcast chat relay: tracks live connections,
//! runs one session state machine per connection, and fans events out to
//! every connected peer.

pub mod broadcast;
pub mod connection;
pub mod handlers;
pub mod protocol;
pub mod server;

pub use server::run;
