//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod device_location_adapter;
mod directory_adapter;
mod weather_adapter;

pub use device_location_adapter::DeviceLocationAdapter;
pub use directory_adapter::FirestoreDirectoryAdapter;
pub use weather_adapter::WeatherAdapter;
