//! Error handling utilities for stores

use relay_core::error::DomainError;
use sqlx::Error as SqlxError;

/// Every driver failure surfaces to the relay as an unavailable store
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::unavailable(e)
}
