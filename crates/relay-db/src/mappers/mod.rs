//! Entity to model mappers
//!
//! - `From<Model> for Entity`: convert database rows to domain objects
//! - `*Insert` structs: prepare entity data for database operations

mod message;

pub use message::ChatMessageInsert;
