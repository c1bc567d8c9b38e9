//! Client event handlers
//!
//! One handler per `ClientEvent` kind, driven by the per-connection `Session`.

mod error;
mod init;
mod message;
mod session;
mod typing;

pub use error::{HandlerError, HandlerResult};
pub use init::InitHandler;
pub use message::ChatMessageHandler;
pub use session::{Session, SessionPhase};
pub use typing::TypingHandler;

#[cfg(test)]
pub(crate) mod testing;
