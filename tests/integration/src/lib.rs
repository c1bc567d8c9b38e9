//! Integration test utilities for the chat relay
//!
//! Spawns the real gateway router on an ephemeral port and drives it with
//! WebSocket and HTTP clients.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
