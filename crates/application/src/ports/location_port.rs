//! Device location port
//!
//! Abstracts the platform location provider: the permission prompt, the
//! current position fix, and reverse geocoding of a coordinate into a
//! human-readable address.

use async_trait::async_trait;
use domain::Coordinate;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;

/// Outcome of a location permission request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionStatus {
    /// Location access allowed
    Granted,
    /// Location access refused
    Denied,
}

impl PermissionStatus {
    /// Whether location access was allowed
    #[must_use]
    pub const fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// Port for the device location provider
#[cfg_attr(test, automock)]
#[async_trait]
pub trait LocationPort: Send + Sync {
    /// Ask for location access
    async fn request_permission(&self) -> PermissionStatus;

    /// Get the current position fix
    ///
    /// # Errors
    ///
    /// Returns `Unavailable` when no fix can be produced right now.
    async fn current_coordinate(&self) -> Result<Coordinate, ApplicationError>;

    /// Turn a coordinate into a formatted, comma-separated address
    ///
    /// # Errors
    ///
    /// Returns `Lookup` when the geocoder fails or has no result.
    async fn reverse_geocode(&self, coordinate: &Coordinate) -> Result<String, ApplicationError>;
}

/// Request permission, then read the current position
///
/// # Errors
///
/// Returns `PermissionDenied` if access is refused, otherwise whatever the
/// provider returns for the position fix.
pub async fn locate_device(location: &dyn LocationPort) -> Result<Coordinate, ApplicationError> {
    match location.request_permission().await {
        PermissionStatus::Granted => location.current_coordinate().await,
        PermissionStatus::Denied => Err(ApplicationError::PermissionDenied(
            "Permission to access location was denied".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn locate_device_reads_position_when_granted() {
        let mut mock = MockLocationPort::new();
        mock.expect_request_permission()
            .times(1)
            .returning(|| PermissionStatus::Granted);
        mock.expect_current_coordinate()
            .times(1)
            .returning(|| Ok(Coordinate::kochi()));

        let coordinate = locate_device(&mock).await.unwrap();
        assert_eq!(coordinate, Coordinate::kochi());
    }

    #[tokio::test]
    async fn locate_device_stops_at_denied_permission() {
        let mut mock = MockLocationPort::new();
        mock.expect_request_permission()
            .returning(|| PermissionStatus::Denied);
        mock.expect_current_coordinate().never();

        let err = locate_device(&mock).await.unwrap_err();
        assert!(err.is_permission_denied());
    }

    #[test]
    fn permission_status_serializes_snake_case() {
        let json = serde_json::to_string(&PermissionStatus::Denied).unwrap();
        assert_eq!(json, "\"denied\"");
        assert!(PermissionStatus::Granted.is_granted());
    }
}
