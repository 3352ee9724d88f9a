//! Domain errors

use thiserror::Error;

/// Domain result type
pub type Result<T> = std::result::Result<T, DomainError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Request could not reach the backend; safe to retry
    #[error("Network error: {0}")]
    Network(String),

    /// Backend declined a dial request for this record
    #[error("Dispatch rejected: {0}")]
    Rejected(String),

    /// Record's current status does not permit the requested action
    #[error("Record not eligible: {0}")]
    NotEligible(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Whether the next poll tick may succeed where this attempt failed
    pub fn is_transient(&self) -> bool {
        matches!(self, DomainError::Network(_))
    }
}
