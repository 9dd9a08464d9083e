//! Device location adapter - Implements LocationPort
//!
//! The position comes from configuration or from whatever the presentation
//! layer pushes in (e.g. coordinates typed on the command line). Reverse
//! geocoding is delegated to Nominatim.

use std::sync::Arc;

use application::error::ApplicationError;
use application::ports::{LocationPort, PermissionStatus};
use async_trait::async_trait;
use domain::Coordinate;
use integration_transit::{
    GeocodingClient, GeocodingError, NominatimConfig, NominatimGeocodingClient,
};
use parking_lot::RwLock;
use tracing::{debug, instrument};

/// Location provider backed by a settable device position
pub struct DeviceLocationAdapter {
    position: RwLock<Option<Coordinate>>,
    permitted: bool,
    geocoder: Arc<dyn GeocodingClient>,
}

impl std::fmt::Debug for DeviceLocationAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceLocationAdapter")
            .field("position", &*self.position.read())
            .field("permitted", &self.permitted)
            .field("geocoder", &"GeocodingClient")
            .finish()
    }
}

impl DeviceLocationAdapter {
    /// Create an adapter that geocodes through Nominatim
    ///
    /// # Errors
    ///
    /// Returns an error if the geocoding client fails to initialize.
    pub fn new(
        position: Option<Coordinate>,
        permitted: bool,
        config: &NominatimConfig,
    ) -> Result<Self, ApplicationError> {
        let geocoder = NominatimGeocodingClient::new(config)
            .map_err(|e| ApplicationError::Configuration(e.to_string()))?;
        Ok(Self::with_geocoder(position, permitted, Arc::new(geocoder)))
    }

    /// Create an adapter over any geocoding client
    #[must_use]
    pub fn with_geocoder(
        position: Option<Coordinate>,
        permitted: bool,
        geocoder: Arc<dyn GeocodingClient>,
    ) -> Self {
        Self {
            position: RwLock::new(position),
            permitted,
            geocoder,
        }
    }

    /// Replace the current device position
    pub fn set_position(&self, coordinate: Coordinate) {
        *self.position.write() = Some(coordinate);
    }

    /// Map integration geocoding error to application error
    fn map_error(err: GeocodingError) -> ApplicationError {
        match err {
            GeocodingError::ConnectionFailed(e) => ApplicationError::Unavailable(e),
            GeocodingError::Timeout => {
                ApplicationError::Unavailable("reverse geocoding timed out".to_string())
            },
            GeocodingError::RateLimitExceeded => ApplicationError::RateLimited,
            GeocodingError::RequestFailed(e)
            | GeocodingError::ParseError(e)
            | GeocodingError::AddressNotFound(e) => ApplicationError::Lookup(e),
        }
    }
}

#[async_trait]
impl LocationPort for DeviceLocationAdapter {
    async fn request_permission(&self) -> PermissionStatus {
        if self.permitted {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        }
    }

    async fn current_coordinate(&self) -> Result<Coordinate, ApplicationError> {
        if !self.permitted {
            return Err(ApplicationError::PermissionDenied(
                "location sharing is disabled".to_string(),
            ));
        }
        let position = *self.position.read();
        position.ok_or_else(|| ApplicationError::Unavailable("no device position fix".to_string()))
    }

    #[instrument(skip(self), fields(coordinate = %coordinate))]
    async fn reverse_geocode(&self, coordinate: &Coordinate) -> Result<String, ApplicationError> {
        let address = self
            .geocoder
            .reverse_geocode(coordinate.latitude(), coordinate.longitude())
            .await
            .map_err(Self::map_error)?;
        debug!(%address, "Resolved device address");
        Ok(address)
    }
}
