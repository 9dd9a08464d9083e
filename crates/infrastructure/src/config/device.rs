//! Device, tracking loop and staff profile configuration.

use std::time::Duration;

use application::{StaffProfile, TrackingConfig};
use domain::{Coordinate, DomainError, TrackingPolicy};
use serde::{Deserialize, Serialize};

use super::default_true;

/// Device position source
///
/// Without a platform GPS, the device position comes from configuration.
/// Leaving both coordinates unset means "no fix available".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Latitude of the device
    #[serde(default)]
    pub latitude: Option<f64>,

    /// Longitude of the device
    #[serde(default)]
    pub longitude: Option<f64>,

    /// Whether the user allows access to the device location
    #[serde(default = "default_true")]
    pub location_permitted: bool,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            latitude: None,
            longitude: None,
            location_permitted: true,
        }
    }
}

impl DeviceConfig {
    /// Configured device coordinate, if any
    ///
    /// # Errors
    ///
    /// Returns an error if only one axis is set or the pair is out of range.
    pub fn coordinate(&self) -> Result<Option<Coordinate>, String> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Coordinate::new(latitude, longitude)
                .map(Some)
                .map_err(|e| format!("device: {e}")),
            (None, None) => Ok(None),
            _ => Err("device.latitude and device.longitude must be set together".to_string()),
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the coordinate is incomplete or invalid.
    pub fn validate(&self) -> Result<(), String> {
        self.coordinate().map(|_| ())
    }
}

/// Live tracking loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingAppConfig {
    /// Seconds between two bus position polls
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Assumed average bus speed for ETA
    #[serde(default = "default_average_speed_kmh")]
    pub average_speed_kmh: f64,

    /// Distance at which the proximity alert fires
    #[serde(default = "default_alert_threshold_km")]
    pub alert_threshold_km: f64,

    /// Re-read the device position on every poll
    #[serde(default)]
    pub follow_user: bool,
}

fn default_poll_interval_secs() -> u64 {
    application::DEFAULT_POLL_INTERVAL.as_secs()
}

const fn default_average_speed_kmh() -> f64 {
    domain::DEFAULT_AVERAGE_SPEED_KMH
}

const fn default_alert_threshold_km() -> f64 {
    domain::DEFAULT_ALERT_THRESHOLD_KM
}

impl Default for TrackingAppConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
            average_speed_kmh: default_average_speed_kmh(),
            alert_threshold_km: default_alert_threshold_km(),
            follow_user: false,
        }
    }
}

impl TrackingAppConfig {
    /// Convert to the live tracker's configuration
    ///
    /// # Errors
    ///
    /// Returns a validation error for a non-positive speed or negative threshold.
    pub fn to_tracking_config(&self) -> Result<TrackingConfig, DomainError> {
        Ok(TrackingConfig {
            poll_interval: Duration::from_secs(self.poll_interval_secs),
            policy: TrackingPolicy::new(self.average_speed_kmh, self.alert_threshold_km)?,
            follow_user: self.follow_user,
        })
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the interval is zero or the policy is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.poll_interval_secs == 0 {
            return Err("tracking.poll_interval_secs must be greater than 0".to_string());
        }
        self.to_tracking_config()
            .map(|_| ())
            .map_err(|e| format!("tracking: {e}"))
    }
}

/// Staff share profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffAppConfig {
    /// Operator or business name
    #[serde(default = "default_business_name")]
    pub business_name: String,

    /// Contact phone number
    #[serde(default = "default_phone_number")]
    pub phone_number: String,

    /// Staff member on duty
    #[serde(default = "default_staff_name")]
    pub staff_name: String,
}

fn default_business_name() -> String {
    StaffProfile::default().business_name
}

fn default_phone_number() -> String {
    StaffProfile::default().phone_number
}

fn default_staff_name() -> String {
    StaffProfile::default().staff_name
}

impl Default for StaffAppConfig {
    fn default() -> Self {
        let profile = StaffProfile::default();
        Self {
            business_name: profile.business_name,
            phone_number: profile.phone_number,
            staff_name: profile.staff_name,
        }
    }
}

impl StaffAppConfig {
    /// Convert to the share service's profile
    #[must_use]
    pub fn to_staff_profile(&self) -> StaffProfile {
        StaffProfile {
            business_name: self.business_name.clone(),
            phone_number: self.phone_number.clone(),
            staff_name: self.staff_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_without_coordinate() {
        let config = DeviceConfig::default();
        assert!(config.location_permitted);
        assert_eq!(config.coordinate().unwrap(), None);
    }

    #[test]
    fn device_with_coordinate() {
        let config = DeviceConfig {
            latitude: Some(9.9312),
            longitude: Some(76.2673),
            ..DeviceConfig::default()
        };
        let coordinate = config.coordinate().unwrap().unwrap();
        assert!((coordinate.latitude() - 9.9312).abs() < f64::EPSILON);
    }

    #[test]
    fn device_rejects_half_coordinate() {
        let config = DeviceConfig {
            latitude: Some(9.9312),
            ..DeviceConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn device_rejects_out_of_range() {
        let config = DeviceConfig {
            latitude: Some(95.0),
            longitude: Some(76.0),
            ..DeviceConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.contains("95"));
    }

    #[test]
    fn tracking_defaults() {
        let config = TrackingAppConfig::default();
        assert_eq!(config.poll_interval_secs, 5);
        let tracking = config.to_tracking_config().unwrap();
        assert_eq!(tracking.poll_interval, Duration::from_secs(5));
        assert_eq!(tracking.policy, TrackingPolicy::default());
        assert!(!tracking.follow_user);
    }

    #[test]
    fn tracking_rejects_zero_interval_and_bad_speed() {
        let config = TrackingAppConfig {
            poll_interval_secs: 0,
            ..TrackingAppConfig::default()
        };
        assert!(config.validate().is_err());

        let config = TrackingAppConfig {
            average_speed_kmh: 0.0,
            ..TrackingAppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn staff_defaults_match_profile() {
        let profile = StaffAppConfig::default().to_staff_profile();
        assert_eq!(profile, StaffProfile::default());
    }
}
