//! Wire protocol
//!
//! JSON objects, one per text frame, discriminated by a `type` field.

mod messages;
mod payloads;

pub use messages::{ClientEvent, Frame, ServerEvent};
pub use payloads::ChatMessagePayload;
