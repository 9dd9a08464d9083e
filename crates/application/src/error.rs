//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The user denied access to the device location
    #[error("Location permission denied: {0}")]
    PermissionDenied(String),

    /// A provider could not produce a value right now (no fix, network down)
    #[error("Unavailable: {0}")]
    Unavailable(String),

    /// A lookup (reverse geocoding, directory record) failed
    #[error("Lookup failed: {0}")]
    Lookup(String),

    /// Requested record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// External service error
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Operation cannot be performed in the current state
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Check if this error is transient and the operation may succeed on the next cycle
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Unavailable(_) | Self::Lookup(_) | Self::ExternalService(_) | Self::RateLimited
        )
    }

    /// Check if this error means the user refused location access
    pub const fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_errors_are_retryable() {
        assert!(ApplicationError::Unavailable("no fix".into()).is_retryable());
        assert!(ApplicationError::Lookup("geocoder down".into()).is_retryable());
        assert!(ApplicationError::ExternalService("502".into()).is_retryable());
        assert!(ApplicationError::RateLimited.is_retryable());
    }

    #[test]
    fn permission_denied_is_not_retryable() {
        let err = ApplicationError::PermissionDenied("user declined".into());
        assert!(!err.is_retryable());
        assert!(err.is_permission_denied());
    }

    #[test]
    fn domain_error_is_transparent() {
        let err: ApplicationError = DomainError::ValidationError("bad".into()).into();
        assert_eq!(err.to_string(), "Validation failed: bad");
        assert!(!err.is_retryable());
    }
}
