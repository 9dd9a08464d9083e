//! Geographic coordinate value object

use serde::{Deserialize, Serialize};
use std::fmt;

/// Mean Earth radius used for great-circle distances
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A geographic coordinate with latitude and longitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees (-90 to 90)
    latitude: f64,
    /// Longitude in degrees (-180 to 180)
    longitude: f64,
}

/// Error type for invalid coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvalidCoordinates {
    /// Rejected latitude
    pub latitude: f64,
    /// Rejected longitude
    pub longitude: f64,
}

impl fmt::Display for InvalidCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid coordinates ({}, {}): latitude must be -90 to 90, longitude must be -180 to 180",
            self.latitude, self.longitude
        )
    }
}

impl std::error::Error for InvalidCoordinates {}

impl From<InvalidCoordinates> for crate::DomainError {
    fn from(err: InvalidCoordinates) -> Self {
        Self::InvalidCoordinates(format!("{}, {}", err.latitude, err.longitude))
    }
}

impl Coordinate {
    /// Create a new coordinate with validation
    ///
    /// # Errors
    ///
    /// Returns `InvalidCoordinates` if latitude is not in [-90, 90]
    /// or longitude is not in [-180, 180] (NaN is rejected as well)
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinates> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(InvalidCoordinates {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Create a coordinate without validation (for trusted constants)
    ///
    /// Caller must ensure latitude is in [-90, 90] and longitude in [-180, 180]
    #[must_use]
    pub const fn new_unchecked(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Get the latitude
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Get the longitude
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Great-circle distance to another coordinate in kilometers
    #[must_use]
    pub fn distance_km(&self, other: &Self) -> f64 {
        haversine_km(self, other)
    }
}

/// Great-circle distance between two coordinates in kilometers (Haversine formula)
///
/// Symmetric, and zero for identical coordinates.
#[must_use]
pub fn haversine_km(a: &Coordinate, b: &Coordinate) -> f64 {
    let lat1_rad = a.latitude.to_radians();
    let lat2_rad = b.latitude.to_radians();
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lon = (b.longitude - a.longitude).to_radians();

    let h = (lat1_rad.cos() * lat2_rad.cos()).mul_add(
        (delta_lon / 2.0).sin().powi(2),
        (delta_lat / 2.0).sin().powi(2),
    );
    // Rounding can push h a hair past 1.0 for antipodal points
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

/// Common locations for defaults and fixtures
impl Coordinate {
    /// Kochi, Kerala
    #[must_use]
    pub const fn kochi() -> Self {
        Self::new_unchecked(9.9312, 76.2673)
    }

    /// Ernakulam South railway station area
    #[must_use]
    pub const fn ernakulam_south() -> Self {
        Self::new_unchecked(9.9683, 76.2911)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_coordinates() {
        let loc = Coordinate::new(10.0, 76.0).expect("valid coordinates");
        assert!((loc.latitude() - 10.0).abs() < f64::EPSILON);
        assert!((loc.longitude() - 76.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_boundary_coordinates() {
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
        assert!(Coordinate::new(0.0, 0.0).is_ok());
    }

    #[test]
    fn test_invalid_latitude() {
        assert!(Coordinate::new(91.0, 0.0).is_err());
        assert!(Coordinate::new(-91.0, 0.0).is_err());
    }

    #[test]
    fn test_invalid_longitude() {
        assert!(Coordinate::new(0.0, 181.0).is_err());
        assert!(Coordinate::new(0.0, -181.0).is_err());
    }

    #[test]
    fn test_nan_rejected() {
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(0.0, f64::NAN).is_err());
    }

    #[test]
    fn test_invalid_coordinates_converts_to_domain_error() {
        let err = Coordinate::new(95.0, 10.0).unwrap_err();
        let domain: crate::DomainError = err.into();
        assert!(domain.to_string().contains("95"));
    }

    #[test]
    fn test_display() {
        let loc = Coordinate::new(9.9312, 76.2673).expect("valid");
        let display = format!("{loc}");
        assert!(display.contains("9.931200"));
        assert!(display.contains("76.267300"));
    }

    #[test]
    fn test_distance_same_location() {
        let loc = Coordinate::kochi();
        assert!(haversine_km(&loc, &loc).abs() < f64::EPSILON);
    }

    #[test]
    fn test_distance_short_hop() {
        let user = Coordinate::new(10.0, 76.0).expect("valid");
        let bus = Coordinate::new(10.01, 76.01).expect("valid");
        let distance = haversine_km(&user, &bus);
        // ~1.11 km north plus ~1.09 km east
        assert!((distance - 1.56).abs() < 0.01);
        assert!((distance - 1.5).abs() < 0.1);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = Coordinate::kochi();
        let b = Coordinate::ernakulam_south();
        assert!((a.distance_km(&b) - b.distance_km(&a)).abs() < 1e-12);
    }

    #[test]
    fn test_distance_antipodal_is_half_circumference() {
        let a = Coordinate::new(0.0, 0.0).expect("valid");
        let b = Coordinate::new(0.0, 180.0).expect("valid");
        let expected = std::f64::consts::PI * EARTH_RADIUS_KM;
        assert!((haversine_km(&a, &b) - expected).abs() < 0.001);
    }

    #[test]
    fn test_serialization() {
        let loc = Coordinate::new(9.9312, 76.2673).expect("valid");
        let json = serde_json::to_string(&loc).expect("serialize");
        assert!(json.contains("\"latitude\":9.9312"));

        let deserialized: Coordinate = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(loc, deserialized);
    }
}
