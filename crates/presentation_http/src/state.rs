//! Application state shared across handlers

use std::{fmt, sync::Arc};

use application::{
    HomeSummaryService, LocationPort, NearbyService, StaffProfile, StaffShareService,
    TransitDirectoryPort, WeatherPort,
};
use domain::TrackingPolicy;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Nearby buses and stops
    pub nearby_service: Arc<NearbyService>,
    /// Home header (address and weather)
    pub home_service: Arc<HomeSummaryService>,
    /// Staff location share
    pub staff_service: Arc<StaffShareService>,
    /// Device location provider
    pub location: Arc<dyn LocationPort>,
    /// Transit directory
    pub directory: Arc<dyn TransitDirectoryPort>,
    /// Weather provider, absent when no key is configured
    pub weather: Option<Arc<dyn WeatherPort>>,
    /// Distance/ETA parameters for tracking snapshots
    pub policy: TrackingPolicy,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("weather_configured", &self.weather.is_some())
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Build the services on top of the given ports
    pub fn new(
        location: Arc<dyn LocationPort>,
        directory: Arc<dyn TransitDirectoryPort>,
        weather: Option<Arc<dyn WeatherPort>>,
        policy: TrackingPolicy,
        staff_profile: StaffProfile,
    ) -> Self {
        Self {
            nearby_service: Arc::new(NearbyService::new(
                Arc::clone(&location),
                Arc::clone(&directory),
            )),
            home_service: Arc::new(HomeSummaryService::new(
                Arc::clone(&location),
                weather.clone(),
            )),
            staff_service: Arc::new(StaffShareService::new(
                Arc::clone(&location),
                staff_profile,
            )),
            location,
            directory,
            weather,
            policy,
        }
    }
}
