//! Weather service port

use async_trait::async_trait;
use domain::Coordinate;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;

/// Current conditions at a coordinate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    /// Air temperature in Celsius
    pub temp_c: f64,
    /// Provider condition text, e.g. "Partly cloudy"
    pub condition_text: String,
    /// Provider's name for the location, if any
    pub location_name: Option<String>,
}

impl CurrentWeather {
    /// Temperature rounded to whole degrees, halves toward +∞ (-2.5 → -2)
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn rounded_temp_c(&self) -> i64 {
        (self.temp_c + 0.5).floor() as i64
    }
}

/// Port for weather services
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WeatherPort: Send + Sync {
    /// Get current conditions for a coordinate
    async fn current_weather(&self, location: &Coordinate) -> Result<CurrentWeather, ApplicationError>;

    /// Check if the weather service is available
    async fn is_available(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(temp_c: f64) -> CurrentWeather {
        CurrentWeather {
            temp_c,
            condition_text: "Sunny".to_string(),
            location_name: None,
        }
    }

    #[test]
    fn rounds_halves_up() {
        assert_eq!(at(28.5).rounded_temp_c(), 29);
        assert_eq!(at(27.6).rounded_temp_c(), 28);
        assert_eq!(at(-0.4).rounded_temp_c(), 0);
        assert_eq!(at(-2.5).rounded_temp_c(), -2);
        assert_eq!(at(-2.6).rounded_temp_c(), -3);
    }

    #[tokio::test]
    async fn mock_weather_port_works() {
        let mut mock = MockWeatherPort::new();
        mock.expect_current_weather().returning(|_| {
            Ok(CurrentWeather {
                temp_c: 31.2,
                condition_text: "Partly cloudy".to_string(),
                location_name: Some("Kochi".to_string()),
            })
        });

        let weather = mock.current_weather(&Coordinate::kochi()).await.unwrap();
        assert_eq!(weather.rounded_temp_c(), 31);
        assert_eq!(weather.condition_text, "Partly cloudy");
    }
}
