//! Health check handlers

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Liveness check
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub directory: ServiceStatus,
    pub weather: ServiceStatus,
}

/// Status of one upstream
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub configured: bool,
    pub healthy: bool,
}

/// Readiness check
///
/// Only the directory gates readiness. Weather is reported but the home
/// header falls back to a placeholder without it.
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let directory_healthy = state.directory.is_available().await;
    let weather = match &state.weather {
        Some(weather) => ServiceStatus {
            configured: true,
            healthy: weather.is_available().await,
        },
        None => ServiceStatus {
            configured: false,
            healthy: false,
        },
    };

    let status_code = if directory_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(ReadinessResponse {
            ready: directory_healthy,
            directory: ServiceStatus {
                configured: true,
                healthy: directory_healthy,
            },
            weather,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn health_check_reports_version() {
        let Json(resp) = health_check().await;
        assert_eq!(resp.status, "ok");
        assert_eq!(resp.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn readiness_response_serialization() {
        let resp = ReadinessResponse {
            ready: true,
            directory: ServiceStatus {
                configured: true,
                healthy: true,
            },
            weather: ServiceStatus {
                configured: false,
                healthy: false,
            },
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"ready\":true"));
        assert!(json.contains("\"weather\":{\"configured\":false"));
    }
}
