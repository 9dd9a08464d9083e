//! Adapter wiring from configuration

use std::sync::Arc;

use application::error::ApplicationError;
use tracing::info;

use crate::adapters::{DeviceLocationAdapter, FirestoreDirectoryAdapter, WeatherAdapter};
use crate::config::AppConfig;

/// Concrete adapters built from an [`AppConfig`]
#[derive(Debug, Clone)]
pub struct Adapters {
    /// Device position and reverse geocoding
    pub location: Arc<DeviceLocationAdapter>,
    /// Bus and stop directory
    pub directory: Arc<FirestoreDirectoryAdapter>,
    /// Current weather, absent when no API key is configured
    pub weather: Option<Arc<WeatherAdapter>>,
}

impl Adapters {
    /// Build every adapter
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a section is invalid or a client fails to initialize.
    pub fn from_config(config: &AppConfig) -> Result<Self, ApplicationError> {
        let position = config
            .device
            .coordinate()
            .map_err(ApplicationError::Configuration)?;
        let location = DeviceLocationAdapter::new(
            position,
            config.device.location_permitted,
            &config.geocoding,
        )?;

        let directory = FirestoreDirectoryAdapter::new(&config.directory.to_directory_config())?;

        let weather = match &config.weather {
            Some(weather) => Some(Arc::new(WeatherAdapter::new(&weather.to_weather_config())?)),
            None => {
                info!("No weather API key configured, weather badge disabled");
                None
            },
        };

        Ok(Self {
            location: Arc::new(location),
            directory: Arc::new(directory),
            weather,
        })
    }
}
