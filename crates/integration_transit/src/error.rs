//! Directory error types

use thiserror::Error;

/// Errors that can occur while reading the transit directory
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// Connection to the directory service failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// HTTP request to the directory service failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse response from the directory service
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded, retry after {retry_after_secs:?} seconds")]
    RateLimitExceeded {
        /// Seconds to wait before retrying (if provided by API)
        retry_after_secs: Option<u64>,
    },

    /// Credentials or project settings were rejected
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// Service is temporarily unavailable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Request timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },
}

impl DirectoryError {
    /// Returns true if this error is retryable
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_)
                | Self::RequestFailed(_)
                | Self::ServiceUnavailable(_)
                | Self::Timeout { .. }
                | Self::RateLimitExceeded { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(DirectoryError::ConnectionFailed("reset".to_string()).is_retryable());
        assert!(DirectoryError::ServiceUnavailable("HTTP 503".to_string()).is_retryable());
        assert!(DirectoryError::Timeout { timeout_secs: 10 }.is_retryable());
        assert!(
            DirectoryError::RateLimitExceeded {
                retry_after_secs: None
            }
            .is_retryable()
        );
    }

    #[test]
    fn test_non_retryable_errors() {
        assert!(!DirectoryError::ParseError("bad json".to_string()).is_retryable());
        assert!(!DirectoryError::AccessDenied("HTTP 403".to_string()).is_retryable());
        assert!(!DirectoryError::ConfigurationError("no project".to_string()).is_retryable());
    }

    #[test]
    fn test_error_display() {
        let err = DirectoryError::RateLimitExceeded {
            retry_after_secs: Some(30),
        };
        assert!(err.to_string().contains("30"));

        let err = DirectoryError::Timeout { timeout_secs: 7 };
        assert_eq!(err.to_string(), "Request timed out after 7 seconds");
    }
}
