//! Route definitions

use axum::{Router, routing::get};

use crate::{handlers, state::AppState};

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health and status endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        // Rider API (v1)
        .route("/v1/home", get(handlers::home::home_summary))
        .route("/v1/buses/nearby", get(handlers::nearby::nearby_buses))
        .route("/v1/stops/nearby", get(handlers::nearby::nearby_stops))
        .route("/v1/buses/{id}", get(handlers::buses::get_bus))
        .route(
            "/v1/buses/{id}/tracking",
            get(handlers::buses::tracking_snapshot),
        )
        // Staff API (v1)
        .route(
            "/v1/staff/location-share",
            get(handlers::staff::share_location),
        )
        .with_state(state)
}
