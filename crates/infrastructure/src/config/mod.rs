//! Application configuration
//!
//! Split into focused sub-modules:
//! - `server`: HTTP server settings
//! - `integrations`: Firestore directory, Nominatim geocoding, WeatherAPI.com
//! - `device`: device position, tracking loop, staff profile
//!
//! Sources are layered: serde defaults, an optional `config.toml`, then
//! `SMART_TRANSIT_*` environment variables with `__` between nested keys
//! (e.g. `SMART_TRANSIT_WEATHER__API_KEY`).

mod device;
mod integrations;
mod server;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use device::{DeviceConfig, StaffAppConfig, TrackingAppConfig};
pub use integrations::{DirectoryAppConfig, GeocodingAppConfig, WeatherAppConfig};
pub use server::ServerConfig;

use crate::telemetry::TelemetryConfig;

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "SMART_TRANSIT";

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Transit directory configuration
    #[serde(default)]
    pub directory: DirectoryAppConfig,

    /// Reverse geocoding configuration
    #[serde(default)]
    pub geocoding: GeocodingAppConfig,

    /// Weather configuration (optional; the header shows a placeholder without it)
    #[serde(default)]
    pub weather: Option<WeatherAppConfig>,

    /// Device position source
    #[serde(default)]
    pub device: DeviceConfig,

    /// Live tracking loop
    #[serde(default)]
    pub tracking: TrackingAppConfig,

    /// Staff share profile
    #[serde(default)]
    pub staff: StaffAppConfig,

    /// Logging
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from `config.toml` (if present) and the environment
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from the given file (optional) and the environment
    ///
    /// A name without extension is resolved against every supported format.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, config::ConfigError> {
        let name = path.as_ref().to_string_lossy().into_owned();
        let builder = config::Config::builder()
            .add_source(config::File::with_name(&name).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Validate every section
    ///
    /// # Errors
    ///
    /// Returns all problems found, joined by `; `.
    pub fn validate(&self) -> Result<(), String> {
        let mut problems = Vec::new();
        let checks = [
            self.server.validate(),
            self.directory.validate(),
            self.geocoding.validate(),
            self.weather.as_ref().map_or(Ok(()), WeatherAppConfig::validate),
            self.device.validate(),
            self.tracking.validate(),
        ];
        for check in checks {
            if let Err(problem) = check {
                problems.push(problem);
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems.join("; "))
        }
    }
}
