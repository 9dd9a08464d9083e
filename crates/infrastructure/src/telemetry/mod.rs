//! Logging initialisation
//!
//! Installs a `tracing-subscriber` registry with an `EnvFilter` and a
//! human-readable or JSON `fmt` layer.

mod subscriber;

pub use subscriber::{TelemetryConfig, TelemetryError, init_telemetry};
