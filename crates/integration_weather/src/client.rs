//! WeatherAPI.com client
//!
//! HTTP client for the `current.json` endpoint of WeatherAPI.com.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::models::{ApiErrorResponse, ApiResponse, CurrentConditions};

/// Provider error codes for key problems
const KEY_ERROR_CODES: [u32; 4] = [1002, 2006, 2007, 2008];

/// Weather client errors
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Connection to the weather service failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to the weather service failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse response from weather service
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Invalid coordinates provided
    #[error("Invalid coordinates: latitude must be -90 to 90, longitude must be -180 to 180")]
    InvalidCoordinates,

    /// The API key is missing, invalid, disabled or over quota
    #[error("API key rejected: {0}")]
    Unauthorized(String),

    /// Service is temporarily unavailable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}

impl WeatherError {
    /// Returns true if this error is retryable
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_)
                | Self::RequestFailed(_)
                | Self::ServiceUnavailable(_)
                | Self::RateLimitExceeded
        )
    }
}

/// Weather service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// WeatherAPI.com base URL (default: <https://api.weatherapi.com/v1>)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key sent as the `key` query parameter
    #[serde(default)]
    pub api_key: Option<String>,

    /// Connection timeout in seconds (default: 10)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.weatherapi.com/v1".to_string()
}

const fn default_timeout() -> u64 {
    10
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout_secs: default_timeout(),
        }
    }
}

impl WeatherConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            api_key: Some("test-key".to_string()),
            timeout_secs: 5,
            ..Default::default()
        }
    }
}

/// Weather client trait for fetching weather data
#[async_trait]
pub trait WeatherClient: Send + Sync {
    /// Get current conditions for a location
    async fn get_current(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<CurrentConditions, WeatherError>;

    /// Check if the weather service is healthy
    async fn is_healthy(&self) -> bool;
}

/// WeatherAPI.com HTTP client implementation
#[derive(Debug)]
pub struct WeatherApiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl WeatherApiClient {
    /// Create a new client with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing or the HTTP client cannot be initialized.
    pub fn new(config: &WeatherConfig) -> Result<Self, WeatherError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| WeatherError::Unauthorized("WeatherAPI key is required".to_string()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| WeatherError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Validate coordinates
    fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), WeatherError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(WeatherError::InvalidCoordinates);
        }
        Ok(())
    }

    /// Map a 4xx error body to an error
    fn classify_client_error(status: StatusCode, body: &str) -> WeatherError {
        match serde_json::from_str::<ApiErrorResponse>(body) {
            Ok(parsed) if KEY_ERROR_CODES.contains(&parsed.error.code) => {
                WeatherError::Unauthorized(parsed.error.message)
            },
            Ok(parsed) => WeatherError::RequestFailed(format!(
                "HTTP {status}: {} ({})",
                parsed.error.message, parsed.error.code
            )),
            Err(_) if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) => {
                WeatherError::Unauthorized(format!("HTTP {status}"))
            },
            Err(_) => WeatherError::RequestFailed(format!("HTTP {status}")),
        }
    }
}

#[async_trait]
impl WeatherClient for WeatherApiClient {
    #[instrument(skip(self), fields(lat = %latitude, lon = %longitude))]
    async fn get_current(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<CurrentConditions, WeatherError> {
        Self::validate_coordinates(latitude, longitude)?;

        let url = format!("{}/current.json", self.base_url);
        let params = [
            ("key", self.api_key.clone()),
            ("q", format!("{latitude},{longitude}")),
            ("aqi", "no".to_string()),
        ];

        debug!(url = %url, "Fetching current weather");

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| WeatherError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(WeatherError::RateLimitExceeded);
        }
        if status.is_server_error() {
            return Err(WeatherError::ServiceUnavailable(format!("HTTP {status}")));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::classify_client_error(status, &body));
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::ParseError(e.to_string()))?;

        api_response.into_conditions().ok_or_else(|| {
            WeatherError::ParseError("No current weather data in response".to_string())
        })
    }

    async fn is_healthy(&self) -> bool {
        self.get_current(0.0, 0.0).await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = WeatherConfig::default();
        assert_eq!(config.base_url, "https://api.weatherapi.com/v1");
        assert_eq!(config.timeout_secs, 10);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_client_requires_api_key() {
        let config = WeatherConfig::default();
        let err = WeatherApiClient::new(&config).unwrap_err();
        assert!(matches!(err, WeatherError::Unauthorized(_)));

        let blank = WeatherConfig {
            api_key: Some("  ".to_string()),
            ..WeatherConfig::default()
        };
        assert!(WeatherApiClient::new(&blank).is_err());
    }

    #[test]
    fn test_client_with_key() {
        assert!(WeatherApiClient::new(&WeatherConfig::for_testing()).is_ok());
    }

    #[test]
    fn test_validate_coordinates() {
        assert!(WeatherApiClient::validate_coordinates(9.93, 76.26).is_ok());
        assert!(WeatherApiClient::validate_coordinates(91.0, 0.0).is_err());
        assert!(WeatherApiClient::validate_coordinates(0.0, -181.0).is_err());
    }

    #[test]
    fn test_classify_client_error() {
        let body = r#"{"error": {"code": 2007, "message": "API key has exceeded calls per month quota."}}"#;
        let err = WeatherApiClient::classify_client_error(StatusCode::FORBIDDEN, body);
        assert!(matches!(err, WeatherError::Unauthorized(_)));

        let body = r#"{"error": {"code": 1006, "message": "No matching location found."}}"#;
        let err = WeatherApiClient::classify_client_error(StatusCode::BAD_REQUEST, body);
        assert!(matches!(err, WeatherError::RequestFailed(_)));
        assert!(err.to_string().contains("1006"));

        let err = WeatherApiClient::classify_client_error(StatusCode::UNAUTHORIZED, "");
        assert!(matches!(err, WeatherError::Unauthorized(_)));
    }

    #[test]
    fn test_retryable() {
        assert!(WeatherError::ServiceUnavailable("HTTP 503".into()).is_retryable());
        assert!(WeatherError::RateLimitExceeded.is_retryable());
        assert!(!WeatherError::Unauthorized("bad key".into()).is_retryable());
        assert!(!WeatherError::InvalidCoordinates.is_retryable());
    }
}
