//! Integration configurations: Firestore directory, Nominatim geocoding, WeatherAPI.com.

use integration_transit::{DirectoryConfig, NominatimConfig};
use integration_weather::WeatherConfig;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

// ==============================
// Directory Configuration
// ==============================

/// Transit directory (Firestore) configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct DirectoryAppConfig {
    /// Firestore REST base URL
    #[serde(default = "default_directory_base_url")]
    pub base_url: String,

    /// Project holding the `buses` and `busStops` collections
    #[serde(default = "default_project_id")]
    pub project_id: String,

    /// Database id
    #[serde(default = "default_database_id")]
    pub database_id: String,

    /// Web API key (sensitive - uses `SecretString`)
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,

    /// Request timeout in seconds
    #[serde(default = "default_directory_timeout")]
    pub timeout_secs: u64,

    /// Documents requested per page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Upper bound on pages fetched for one listing
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
}

fn default_directory_base_url() -> String {
    DirectoryConfig::default().base_url
}

fn default_project_id() -> String {
    DirectoryConfig::default().project_id
}

fn default_database_id() -> String {
    DirectoryConfig::default().database_id
}

fn default_directory_timeout() -> u64 {
    DirectoryConfig::default().timeout_secs
}

fn default_page_size() -> u32 {
    DirectoryConfig::default().page_size
}

fn default_max_pages() -> u32 {
    DirectoryConfig::default().max_pages
}

impl Default for DirectoryAppConfig {
    fn default() -> Self {
        Self {
            base_url: default_directory_base_url(),
            project_id: default_project_id(),
            database_id: default_database_id(),
            api_key: None,
            timeout_secs: default_directory_timeout(),
            page_size: default_page_size(),
            max_pages: default_max_pages(),
        }
    }
}

impl std::fmt::Debug for DirectoryAppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryAppConfig")
            .field("base_url", &self.base_url)
            .field("project_id", &self.project_id)
            .field("database_id", &self.database_id)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .field("page_size", &self.page_size)
            .field("max_pages", &self.max_pages)
            .finish()
    }
}

impl DirectoryAppConfig {
    /// Convert to `integration_transit`'s `DirectoryConfig`
    #[must_use]
    pub fn to_directory_config(&self) -> DirectoryConfig {
        DirectoryConfig {
            base_url: self.base_url.clone(),
            project_id: self.project_id.clone(),
            database_id: self.database_id.clone(),
            api_key: self
                .api_key
                .as_ref()
                .map(|key| key.expose_secret().to_string()),
            timeout_secs: self.timeout_secs,
            page_size: self.page_size,
            max_pages: self.max_pages,
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the converted client configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        self.to_directory_config().validate()
    }
}

// ==============================
// Geocoding Configuration
// ==============================

/// Reverse geocoding configuration
///
/// Holds no secrets, so the integration type is used as-is.
pub type GeocodingAppConfig = NominatimConfig;

// ==============================
// Weather Configuration
// ==============================

/// WeatherAPI.com configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct WeatherAppConfig {
    /// API base URL
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,

    /// API key (sensitive - uses `SecretString`)
    #[serde(skip_serializing)]
    pub api_key: SecretString,

    /// Request timeout in seconds
    #[serde(default = "default_weather_timeout")]
    pub timeout_secs: u64,
}

fn default_weather_base_url() -> String {
    WeatherConfig::default().base_url
}

fn default_weather_timeout() -> u64 {
    WeatherConfig::default().timeout_secs
}

impl std::fmt::Debug for WeatherAppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherAppConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl WeatherAppConfig {
    /// Create a configuration with the given key and default endpoint
    #[must_use]
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            base_url: default_weather_base_url(),
            api_key: SecretString::from(api_key.into()),
            timeout_secs: default_weather_timeout(),
        }
    }

    /// Convert to `integration_weather`'s `WeatherConfig`
    #[must_use]
    pub fn to_weather_config(&self) -> WeatherConfig {
        WeatherConfig {
            base_url: self.base_url.clone(),
            api_key: Some(self.api_key.expose_secret().to_string()),
            timeout_secs: self.timeout_secs,
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the key is blank or the timeout is zero.
    pub fn validate(&self) -> Result<(), String> {
        if self.api_key.expose_secret().trim().is_empty() {
            return Err("weather.api_key must not be empty".to_string());
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(format!(
                "weather.base_url must be an http(s) URL, got '{}'",
                self.base_url
            ));
        }
        if self.timeout_secs == 0 {
            return Err("weather.timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_defaults_match_client_defaults() {
        let config = DirectoryAppConfig::default().to_directory_config();
        let expected = DirectoryConfig::default();
        assert_eq!(config.base_url, expected.base_url);
        assert_eq!(config.project_id, expected.project_id);
        assert_eq!(config.page_size, expected.page_size);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn directory_api_key_is_exposed_only_on_conversion() {
        let config = DirectoryAppConfig {
            api_key: Some(SecretString::from("firestore-key".to_string())),
            ..DirectoryAppConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("firestore-key"));
        assert!(debug.contains("[REDACTED]"));

        assert_eq!(
            config.to_directory_config().api_key.as_deref(),
            Some("firestore-key")
        );
    }

    #[test]
    fn directory_validation_delegates() {
        let config = DirectoryAppConfig {
            project_id: String::new(),
            ..DirectoryAppConfig::default()
        };
        assert!(config.validate().is_err());
        assert!(DirectoryAppConfig::default().validate().is_ok());
    }

    #[test]
    fn weather_config_conversion() {
        let config = WeatherAppConfig::with_api_key("wx-key");
        let converted = config.to_weather_config();
        assert_eq!(converted.api_key.as_deref(), Some("wx-key"));
        assert_eq!(converted.base_url, "https://api.weatherapi.com/v1");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn weather_debug_redacts_key() {
        let config = WeatherAppConfig::with_api_key("wx-key");
        let debug = format!("{config:?}");
        assert!(!debug.contains("wx-key"));
    }

    #[test]
    fn weather_validation() {
        assert!(WeatherAppConfig::with_api_key("  ").validate().is_err());

        let config = WeatherAppConfig {
            base_url: "api.weatherapi.com".to_string(),
            ..WeatherAppConfig::with_api_key("k")
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn weather_deserialize_requires_key() {
        let parsed: Result<WeatherAppConfig, _> = serde_json::from_str("{}");
        assert!(parsed.is_err());

        let parsed: WeatherAppConfig = serde_json::from_str(r#"{"api_key": "abc"}"#).unwrap();
        assert_eq!(parsed.timeout_secs, 10);
    }
}
