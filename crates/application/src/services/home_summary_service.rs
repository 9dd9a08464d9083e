//! Home screen summary
//!
//! Builds the header shown on the rider and stop screens: a shortened
//! address line and the current weather with an icon name. Both parts
//! degrade to placeholders instead of failing.

use std::fmt;
use std::sync::Arc;

use domain::Coordinate;
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use crate::error::ApplicationError;
use crate::ports::{CurrentWeather, LocationPort, WeatherPort, locate_device};

/// Number of comma-separated address parts kept in the header
pub const ADDRESS_PARTS: usize = 5;

/// Shown while a value has not arrived yet
pub const LOADING_PLACEHOLDER: &str = "Loading...";

/// Shown when the geocoder returned nothing usable
pub const UNKNOWN_LOCATION: &str = "Unknown Location";

/// Icon used for conditions without a dedicated icon
pub const FALLBACK_WEATHER_ICON: &str = "weather-cloudy";

/// Weather part of the header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherBadge {
    /// Rounded temperature in Celsius
    pub temperature_c: i64,
    /// Provider condition text
    pub condition: String,
    /// Icon name for the condition
    pub icon: String,
}

impl From<&CurrentWeather> for WeatherBadge {
    fn from(weather: &CurrentWeather) -> Self {
        Self {
            temperature_c: weather.rounded_temp_c(),
            condition: weather.condition_text.clone(),
            icon: weather_icon(&weather.condition_text).to_string(),
        }
    }
}

impl fmt::Display for WeatherBadge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°C {}", self.temperature_c, self.condition)
    }
}

/// Header content for the home screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeSummary {
    /// Shortened address
    pub address_line: String,
    /// Current weather, `None` while unavailable
    pub weather: Option<WeatherBadge>,
}

impl HomeSummary {
    /// Weather text, or the loading placeholder
    #[must_use]
    pub fn weather_line(&self) -> String {
        self.weather
            .as_ref()
            .map_or_else(|| LOADING_PLACEHOLDER.to_string(), ToString::to_string)
    }
}

/// Keep the first [`ADDRESS_PARTS`] comma-separated parts of an address
#[must_use]
pub fn summarize_address(formatted: &str) -> String {
    let parts: Vec<&str> = formatted
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .take(ADDRESS_PARTS)
        .collect();

    if parts.is_empty() {
        UNKNOWN_LOCATION.to_string()
    } else {
        parts.join(", ")
    }
}

/// Map a provider condition text to an icon name
#[must_use]
pub fn weather_icon(condition_text: &str) -> &'static str {
    match condition_text.trim().to_lowercase().as_str() {
        "sunny" | "clear" => "weather-sunny",
        "partly cloudy" => "weather-partly-cloudy",
        "cloudy" | "overcast" => "weather-cloudy",
        "mist" | "fog" => "weather-fog",
        "patchy rain possible" => "weather-partly-rainy",
        "light rain" | "rain" => "weather-rainy",
        "heavy rain" => "weather-pouring",
        "thunderstorm" => "weather-lightning",
        "snow" => "weather-snowy",
        "heavy snow" => "weather-snowy-heavy",
        _ => FALLBACK_WEATHER_ICON,
    }
}

/// Service producing the home screen header
pub struct HomeSummaryService {
    location: Arc<dyn LocationPort>,
    weather: Option<Arc<dyn WeatherPort>>,
}

impl fmt::Debug for HomeSummaryService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HomeSummaryService")
            .field("has_weather", &self.weather.is_some())
            .finish_non_exhaustive()
    }
}

impl HomeSummaryService {
    /// Create the service; weather is optional
    pub fn new(location: Arc<dyn LocationPort>, weather: Option<Arc<dyn WeatherPort>>) -> Self {
        Self { location, weather }
    }

    /// Summary for the device's current position
    ///
    /// # Errors
    ///
    /// Returns an error only if the device position cannot be read.
    pub async fn summary_from_device(&self) -> Result<HomeSummary, ApplicationError> {
        let origin = locate_device(self.location.as_ref()).await?;
        Ok(self.summary_for(&origin).await)
    }

    /// Summary for a known coordinate
    ///
    /// Geocoding and weather run concurrently; a failure in either leaves the
    /// matching placeholder in place.
    #[instrument(skip(self, origin), fields(origin = %origin))]
    pub async fn summary_for(&self, origin: &Coordinate) -> HomeSummary {
        let (address, weather) = tokio::join!(
            self.location.reverse_geocode(origin),
            self.fetch_weather(origin)
        );

        let address_line = match address {
            Ok(formatted) => summarize_address(&formatted),
            Err(e) => {
                warn!(error = %e, "Reverse geocoding failed");
                UNKNOWN_LOCATION.to_string()
            },
        };

        HomeSummary {
            address_line,
            weather,
        }
    }

    async fn fetch_weather(&self, origin: &Coordinate) -> Option<WeatherBadge> {
        let weather = self.weather.as_ref()?;
        match weather.current_weather(origin).await {
            Ok(current) => Some(WeatherBadge::from(&current)),
            Err(e) => {
                warn!(error = %e, "Weather lookup failed");
                None
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{MockLocationPort, MockWeatherPort, PermissionStatus};

    fn location_with_address(address: &'static str) -> MockLocationPort {
        let mut mock = MockLocationPort::new();
        mock.expect_request_permission()
            .returning(|| PermissionStatus::Granted);
        mock.expect_current_coordinate()
            .returning(|| Ok(Coordinate::kochi()));
        mock.expect_reverse_geocode()
            .returning(move |_| Ok(address.to_string()));
        mock
    }

    fn weather_reporting(temp_c: f64, condition: &'static str) -> MockWeatherPort {
        let mut mock = MockWeatherPort::new();
        mock.expect_current_weather().returning(move |_| {
            Ok(CurrentWeather {
                temp_c,
                condition_text: condition.to_string(),
                location_name: None,
            })
        });
        mock
    }

    #[test]
    fn address_keeps_first_five_parts() {
        let address = "Jos Junction, MG Road, Ernakulam, Kochi, Kerala, 682016, India";
        assert_eq!(
            summarize_address(address),
            "Jos Junction, MG Road, Ernakulam, Kochi, Kerala"
        );
        assert_eq!(summarize_address("Kochi, India"), "Kochi, India");
    }

    #[test]
    fn blank_address_is_unknown() {
        assert_eq!(summarize_address(""), UNKNOWN_LOCATION);
        assert_eq!(summarize_address(" , ,"), UNKNOWN_LOCATION);
    }

    #[test]
    fn icon_mapping() {
        assert_eq!(weather_icon("Sunny"), "weather-sunny");
        assert_eq!(weather_icon("Partly cloudy"), "weather-partly-cloudy");
        assert_eq!(weather_icon("Patchy rain possible"), "weather-partly-rainy");
        assert_eq!(weather_icon("Heavy rain"), "weather-pouring");
        assert_eq!(weather_icon("Thundery outbreaks possible"), FALLBACK_WEATHER_ICON);
    }

    #[tokio::test]
    async fn summary_combines_address_and_weather() {
        let service = HomeSummaryService::new(
            Arc::new(location_with_address(
                "MG Road, Ernakulam, Kochi, Kerala, 682016, India",
            )),
            Some(Arc::new(weather_reporting(30.6, "Partly cloudy"))),
        );

        let summary = service.summary_from_device().await.unwrap();

        assert_eq!(summary.address_line, "MG Road, Ernakulam, Kochi, Kerala, 682016");
        assert_eq!(summary.weather_line(), "31°C Partly cloudy");
        assert_eq!(
            summary.weather.unwrap().icon,
            "weather-partly-cloudy".to_string()
        );
    }

    #[tokio::test]
    async fn failures_degrade_to_placeholders() {
        let mut location = MockLocationPort::new();
        location
            .expect_reverse_geocode()
            .returning(|_| Err(ApplicationError::Lookup("geocoder offline".into())));
        let mut weather = MockWeatherPort::new();
        weather
            .expect_current_weather()
            .returning(|_| Err(ApplicationError::ExternalService("503".into())));

        let service = HomeSummaryService::new(Arc::new(location), Some(Arc::new(weather)));
        let summary = service.summary_for(&Coordinate::kochi()).await;

        assert_eq!(summary.address_line, UNKNOWN_LOCATION);
        assert!(summary.weather.is_none());
        assert_eq!(summary.weather_line(), LOADING_PLACEHOLDER);
    }

    #[tokio::test]
    async fn weather_is_optional() {
        let service = HomeSummaryService::new(Arc::new(location_with_address("Kochi")), None);
        let summary = service.summary_for(&Coordinate::kochi()).await;
        assert_eq!(summary.address_line, "Kochi");
        assert_eq!(summary.weather_line(), LOADING_PLACEHOLDER);
    }

    #[tokio::test]
    async fn denied_permission_is_an_error() {
        let mut location = MockLocationPort::new();
        location
            .expect_request_permission()
            .returning(|| PermissionStatus::Denied);
        let service = HomeSummaryService::new(Arc::new(location), None);

        let err = service.summary_from_device().await.unwrap_err();
        assert!(err.is_permission_denied());
    }
}
