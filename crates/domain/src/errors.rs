//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Coordinate outside the valid latitude/longitude range
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),

    /// Operation not valid in the current state
    #[error("Invalid state transition: {0}")]
    InvalidState(String),
}
