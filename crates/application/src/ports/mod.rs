//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod location_port;
mod tracking_events_port;
mod transit_directory_port;
mod weather_port;

#[cfg(test)]
pub use location_port::MockLocationPort;
pub use location_port::{LocationPort, PermissionStatus, locate_device};
#[cfg(test)]
pub use tracking_events_port::MockTrackingEventsPort;
pub use tracking_events_port::{TrackingEventsPort, TrackingNotice};
#[cfg(test)]
pub use transit_directory_port::MockTransitDirectoryPort;
pub use transit_directory_port::{DirectoryCollection, TransitDirectoryPort};
#[cfg(test)]
pub use weather_port::MockWeatherPort;
pub use weather_port::{CurrentWeather, WeatherPort};
