//! Domain errors - error types for the domain layer

use thiserror::Error;

/// Domain layer errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The backing message store could not be reached or rejected the operation
    #[error("Message store unavailable: {0}")]
    StoreUnavailable(String),
}

impl DomainError {
    /// Get a stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::StoreUnavailable(_) => "STORE_UNAVAILABLE",
        }
    }

    /// Check if the error means the store is unreachable
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_))
    }

    /// Build a `StoreUnavailable` from any displayable cause
    pub fn unavailable(cause: impl std::fmt::Display) -> Self {
        Self::StoreUnavailable(cause.to_string())
    }
}
