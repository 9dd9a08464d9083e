//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer over the Firestore
//! directory, Nominatim and WeatherAPI.com clients. Also owns configuration
//! loading and logging setup.

pub mod adapters;
pub mod bootstrap;
pub mod config;
pub mod telemetry;

pub use adapters::*;
pub use bootstrap::Adapters;
pub use config::{
    AppConfig, DeviceConfig, DirectoryAppConfig, GeocodingAppConfig, ServerConfig,
    StaffAppConfig, TrackingAppConfig, WeatherAppConfig,
};
pub use telemetry::{TelemetryConfig, TelemetryError, init_telemetry};
