//! Ports implemented by the infrastructure layer

mod message_store;

pub use message_store::{MessageStore, RepoResult};
