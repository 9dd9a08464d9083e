//! HTTP presentation layer
//!
//! Axum routes for nearby lookups, bus details, one-shot tracking
//! snapshots, the home header and the staff location share.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::{ApiError, ErrorResponse, set_expose_internal_errors};
pub use middleware::{ValidatedQuery, ValidationError};
pub use state::AppState;
