//! Nearby buses and stops
//!
//! Gathers the rider's position, the reverse-geocoded address and a
//! directory snapshot, then hands them to the proximity matcher.

use std::fmt;
use std::sync::Arc;

use domain::{AddressFragments, Coordinate, MatchResult};
use serde::Serialize;
use tracing::{debug, instrument, warn};

use super::proximity_matcher::{MatchMode, match_records};
use crate::error::ApplicationError;
use crate::ports::{DirectoryCollection, LocationPort, TransitDirectoryPort, locate_device};

/// Result of a nearby lookup
#[derive(Debug, Clone, Serialize)]
pub struct NearbyOutcome {
    /// Coordinate the lookup was made from
    pub origin: Coordinate,
    /// Formatted address of the origin, when geocoding succeeded
    pub address: Option<String>,
    /// Strategy used
    pub mode: MatchMode,
    /// Matches in result order
    pub results: Vec<MatchResult>,
}

/// Service for finding buses and stops near the rider
pub struct NearbyService {
    location: Arc<dyn LocationPort>,
    directory: Arc<dyn TransitDirectoryPort>,
}

impl fmt::Debug for NearbyService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NearbyService").finish_non_exhaustive()
    }
}

impl NearbyService {
    /// Create a new nearby service
    pub fn new(location: Arc<dyn LocationPort>, directory: Arc<dyn TransitDirectoryPort>) -> Self {
        Self {
            location,
            directory,
        }
    }

    /// Look up matches around the device's current position
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` if location access is refused, or the
    /// directory error if the snapshot cannot be fetched.
    pub async fn nearby_from_device(
        &self,
        collection: DirectoryCollection,
        mode: MatchMode,
    ) -> Result<NearbyOutcome, ApplicationError> {
        let origin = locate_device(self.location.as_ref()).await?;
        self.nearby_from(origin, collection, mode).await
    }

    /// Look up matches around a given coordinate
    ///
    /// The address lookup and the directory fetch run concurrently; matching
    /// only starts once both have settled. A failed address lookup yields an
    /// empty city-token result rather than an error.
    ///
    /// # Errors
    ///
    /// Returns the directory error if the snapshot cannot be fetched.
    #[instrument(skip(self, origin), fields(origin = %origin))]
    pub async fn nearby_from(
        &self,
        origin: Coordinate,
        collection: DirectoryCollection,
        mode: MatchMode,
    ) -> Result<NearbyOutcome, ApplicationError> {
        let (address, records) = tokio::join!(
            self.address_for(&origin, mode),
            self.directory.list_all(collection)
        );
        let records = records?;

        let fragments = address
            .as_deref()
            .map(AddressFragments::from_formatted_address);
        let results = match_records(fragments.as_ref(), Some(&origin), &records, mode);

        debug!(
            directory_size = records.len(),
            matches = results.len(),
            "Proximity match complete"
        );

        Ok(NearbyOutcome {
            origin,
            address,
            mode,
            results,
        })
    }

    async fn address_for(&self, origin: &Coordinate, mode: MatchMode) -> Option<String> {
        if mode != MatchMode::CityToken {
            return None;
        }
        match self.location.reverse_geocode(origin).await {
            Ok(address) => Some(address),
            Err(e) => {
                warn!(error = %e, "Reverse geocoding failed, no city matches this cycle");
                None
            },
        }
    }
}
