//! Staff location sharing
//!
//! Staff devices fetch their position and share it as a plain-text message
//! together with the business contact details.

use std::fmt;
use std::sync::Arc;

use domain::Coordinate;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::error::ApplicationError;
use crate::ports::{LocationPort, locate_device};

/// Shown when sharing is attempted before a position was fetched
pub const LOCATION_REQUIRED_MESSAGE: &str = "Please fetch your location first.";

/// Business details included in a shared message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffProfile {
    /// Operator or business name
    pub business_name: String,
    /// Contact phone number
    pub phone_number: String,
    /// Staff member on duty
    pub staff_name: String,
}

impl Default for StaffProfile {
    fn default() -> Self {
        Self {
            business_name: "My Business".to_string(),
            phone_number: "+1234567890".to_string(),
            staff_name: "John Doe".to_string(),
        }
    }
}

/// Build the share message for a profile and position
///
/// # Errors
///
/// Returns `InvalidOperation` when no position is available yet.
pub fn compose_share_message(
    profile: &StaffProfile,
    coordinate: Option<&Coordinate>,
) -> Result<String, ApplicationError> {
    let coordinate = coordinate
        .ok_or_else(|| ApplicationError::InvalidOperation(LOCATION_REQUIRED_MESSAGE.to_string()))?;

    Ok(format!(
        "Business Name: {}\nPhone: {}\nStaff: {}\nLocation: Latitude {}, Longitude {}",
        profile.business_name,
        profile.phone_number,
        profile.staff_name,
        coordinate.latitude(),
        coordinate.longitude()
    ))
}

/// Service for staff location sharing
pub struct StaffShareService {
    location: Arc<dyn LocationPort>,
    profile: StaffProfile,
}

impl fmt::Debug for StaffShareService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaffShareService")
            .field("profile", &self.profile)
            .finish_non_exhaustive()
    }
}

impl StaffShareService {
    /// Create the service for a staff profile
    pub fn new(location: Arc<dyn LocationPort>, profile: StaffProfile) -> Self {
        Self { location, profile }
    }

    /// The profile used in messages
    #[must_use]
    pub const fn profile(&self) -> &StaffProfile {
        &self.profile
    }

    /// Fetch the device position and build the share message
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` if location access is refused, or the
    /// provider error if no position is available.
    #[instrument(skip(self))]
    pub async fn share_current_location(&self) -> Result<String, ApplicationError> {
        let coordinate = locate_device(self.location.as_ref()).await?;
        info!(location = %coordinate, "Sharing staff location");
        compose_share_message(&self.profile, Some(&coordinate))
    }
}
