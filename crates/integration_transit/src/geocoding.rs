//! Nominatim reverse geocoding client
//!
//! Converts coordinates to a formatted address using the
//! [Nominatim](https://nominatim.openstreetmap.org) API (OpenStreetMap).
//!
//! Implements rate limiting (max 1 request/second per Nominatim usage policy)
//! and result caching keyed by the coordinate rounded to about 11 m.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, instrument};

/// Decimal places kept when building cache keys
const CACHE_KEY_PRECISION: usize = 4;

/// Configuration for the Nominatim geocoding service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NominatimConfig {
    /// Base URL for the Nominatim API
    #[serde(default = "default_geocoding_base_url")]
    pub base_url: String,

    /// Connection timeout in seconds
    #[serde(default = "default_geocoding_timeout_secs")]
    pub timeout_secs: u64,

    /// Cache TTL in minutes (0 to disable)
    #[serde(default = "default_cache_ttl_minutes")]
    pub cache_ttl_minutes: u64,

    /// Preferred response language (`accept-language`)
    #[serde(default = "default_language")]
    pub language: String,

    /// Minimum spacing between two requests in milliseconds
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: u64,
}

fn default_geocoding_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

const fn default_geocoding_timeout_secs() -> u64 {
    5
}

const fn default_cache_ttl_minutes() -> u64 {
    30
}

fn default_language() -> String {
    "en".to_string()
}

const fn default_min_interval_ms() -> u64 {
    1100
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoding_base_url(),
            timeout_secs: default_geocoding_timeout_secs(),
            cache_ttl_minutes: default_cache_ttl_minutes(),
            language: default_language(),
            min_interval_ms: default_min_interval_ms(),
        }
    }
}

impl NominatimConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            timeout_secs: 5,
            cache_ttl_minutes: 0,
            min_interval_ms: 0,
            ..Default::default()
        }
    }

    /// Check if caching is enabled
    #[must_use]
    pub const fn caching_enabled(&self) -> bool {
        self.cache_ttl_minutes > 0
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        url::Url::parse(&self.base_url)
            .map_err(|e| format!("geocoding base_url is not a valid URL: {e}"))?;
        if self.timeout_secs == 0 {
            return Err("geocoding timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// Errors that can occur during geocoding
#[derive(Debug, Error)]
pub enum GeocodingError {
    /// Connection to geocoding service failed
    #[error("Geocoding connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to geocoding service failed
    #[error("Geocoding request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse geocoding response
    #[error("Geocoding parse error: {0}")]
    ParseError(String),

    /// Coordinate could not be resolved to an address
    #[error("Address not found: {0}")]
    AddressNotFound(String),

    /// Rate limit exceeded (max 1 req/sec for Nominatim)
    #[error("Geocoding rate limit exceeded")]
    RateLimitExceeded,

    /// Request timeout
    #[error("Geocoding request timed out")]
    Timeout,
}

impl GeocodingError {
    /// Returns true if this error is retryable
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_) | Self::RequestFailed(_) | Self::RateLimitExceeded | Self::Timeout
        )
    }
}

/// Trait for reverse geocoding clients
#[async_trait]
pub trait GeocodingClient: Send + Sync {
    /// Convert coordinates to a human-readable, comma-separated address
    async fn reverse_geocode(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<String, GeocodingError>;
}

/// Nominatim-based geocoding client with rate limiting and caching
#[derive(Debug)]
pub struct NominatimGeocodingClient {
    client: Client,
    config: NominatimConfig,
    cache: Option<Cache<String, String>>,
    last_request: Arc<Mutex<Instant>>,
}

impl NominatimGeocodingClient {
    /// Create a new Nominatim geocoding client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &NominatimConfig) -> Result<Self, GeocodingError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent("SmartTransit/0.2 (commuter bus tracker)")
            .build()
            .map_err(|e| GeocodingError::ConnectionFailed(e.to_string()))?;

        let cache = config.caching_enabled().then(|| {
            Cache::builder()
                .max_capacity(1000)
                .time_to_live(Duration::from_secs(config.cache_ttl_minutes * 60))
                .build()
        });

        let min_interval = Duration::from_millis(config.min_interval_ms);
        let last_request = Instant::now()
            .checked_sub(min_interval)
            .unwrap_or_else(Instant::now);

        Ok(Self {
            client,
            config: config.clone(),
            cache,
            last_request: Arc::new(Mutex::new(last_request)),
        })
    }

    fn cache_key(latitude: f64, longitude: f64) -> String {
        format!(
            "{latitude:.prec$},{longitude:.prec$}",
            prec = CACHE_KEY_PRECISION
        )
    }

    /// Enforce Nominatim's rate limit
    async fn rate_limit(&self) {
        let min_interval = Duration::from_millis(self.config.min_interval_ms);
        let mut last = self.last_request.lock().await;
        let elapsed = last.elapsed();
        if elapsed < min_interval {
            let wait = min_interval.saturating_sub(elapsed);
            debug!(?wait, "Rate limiting geocoding request");
            tokio::time::sleep(wait).await;
        }
        *last = Instant::now();
    }
}

#[async_trait]
impl GeocodingClient for NominatimGeocodingClient {
    #[instrument(skip(self))]
    async fn reverse_geocode(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<String, GeocodingError> {
        let cache_key = Self::cache_key(latitude, longitude);
        if let Some(cache) = &self.cache {
            if let Some(address) = cache.get(&cache_key).await {
                debug!("Reverse geocoding cache hit");
                return Ok(address);
            }
        }

        self.rate_limit().await;

        let url = format!("{}/reverse", self.config.base_url.trim_end_matches('/'));
        let params = [
            ("lat", latitude.to_string()),
            ("lon", longitude.to_string()),
            ("format", "jsonv2".to_string()),
            ("accept-language", self.config.language.clone()),
        ];

        debug!(%latitude, %longitude, "Reverse geocoding");

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GeocodingError::Timeout
                } else {
                    GeocodingError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(GeocodingError::RateLimitExceeded);
        }
        if !status.is_success() {
            return Err(GeocodingError::RequestFailed(format!("HTTP {status}")));
        }

        let result: ReverseResult = response
            .json()
            .await
            .map_err(|e| GeocodingError::ParseError(e.to_string()))?;

        let address = match (result.display_name, result.error) {
            (Some(name), _) if !name.trim().is_empty() => name,
            (_, Some(reason)) => {
                return Err(GeocodingError::AddressNotFound(format!(
                    "{latitude},{longitude}: {reason}"
                )));
            },
            _ => {
                return Err(GeocodingError::AddressNotFound(format!(
                    "{latitude},{longitude}"
                )));
            },
        };

        if let Some(cache) = &self.cache {
            cache.insert(cache_key, address.clone()).await;
        }
        Ok(address)
    }
}

/// Raw Nominatim reverse response
#[derive(Debug, Deserialize)]
struct ReverseResult {
    display_name: Option<String>,
    error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nominatim_config_default() {
        let config = NominatimConfig::default();
        assert_eq!(config.base_url, "https://nominatim.openstreetmap.org");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.cache_ttl_minutes, 30);
        assert_eq!(config.language, "en");
        assert_eq!(config.min_interval_ms, 1100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_nominatim_config_for_testing() {
        let config = NominatimConfig::for_testing();
        assert_eq!(config.timeout_secs, 5);
        assert!(!config.caching_enabled());
        assert_eq!(config.min_interval_ms, 0);
    }

    #[test]
    fn test_config_validation() {
        let config = NominatimConfig {
            base_url: "nominatim".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cache_key_rounds_coordinates() {
        assert_eq!(
            NominatimGeocodingClient::cache_key(9.931_23, 76.267_34),
            NominatimGeocodingClient::cache_key(9.931_24, 76.267_31)
        );
        assert_eq!(
            NominatimGeocodingClient::cache_key(9.93123, 76.26734),
            "9.9312,76.2673"
        );
    }

    #[test]
    fn test_geocoding_error_display() {
        let err = GeocodingError::AddressNotFound("0,0".to_string());
        assert!(err.to_string().contains("0,0"));

        let err = GeocodingError::Timeout;
        assert!(err.to_string().contains("timed out"));
        assert!(err.is_retryable());
        assert!(!GeocodingError::ParseError("x".into()).is_retryable());
    }

    #[test]
    fn test_reverse_result_parsing() {
        let json = r#"{"display_name": "MG Road, Kochi, Kerala, India", "lat": "9.93"}"#;
        let result: ReverseResult = serde_json::from_str(json).unwrap();
        assert_eq!(
            result.display_name.as_deref(),
            Some("MG Road, Kochi, Kerala, India")
        );

        let json = r#"{"error": "Unable to geocode"}"#;
        let result: ReverseResult = serde_json::from_str(json).unwrap();
        assert!(result.display_name.is_none());
        assert_eq!(result.error.as_deref(), Some("Unable to geocode"));
    }
}
