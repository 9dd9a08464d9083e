//! WeatherAPI.com response models

use serde::{Deserialize, Serialize};

/// Current conditions at a location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// Air temperature in Celsius
    pub temp_c: f64,
    /// Feels-like temperature in Celsius
    pub feelslike_c: Option<f64>,
    /// Condition text, e.g. "Partly cloudy"
    pub condition_text: String,
    /// Provider condition code
    pub condition_code: Option<u32>,
    /// Relative humidity in percent
    pub humidity: Option<u8>,
    /// Wind speed in km/h
    pub wind_kph: Option<f64>,
    /// Whether it is daytime at the location
    pub is_day: bool,
    /// Provider's local time of the observation
    pub last_updated: Option<String>,
    /// Resolved location
    pub location: Option<WeatherLocation>,
}

/// Location resolved by the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherLocation {
    /// Place name
    pub name: String,
    /// Region or state
    #[serde(default)]
    pub region: String,
    /// Country
    #[serde(default)]
    pub country: String,
}

/// Raw `current.json` response
#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse {
    pub location: Option<WeatherLocation>,
    pub current: Option<RawCurrent>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawCurrent {
    pub temp_c: f64,
    pub feelslike_c: Option<f64>,
    pub condition: RawCondition,
    pub humidity: Option<u8>,
    pub wind_kph: Option<f64>,
    #[serde(default)]
    pub is_day: u8,
    pub last_updated: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawCondition {
    pub text: String,
    pub code: Option<u32>,
}

/// Error body returned with 4xx statuses
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorDetail {
    pub code: u32,
    pub message: String,
}

impl ApiResponse {
    pub fn into_conditions(self) -> Option<CurrentConditions> {
        let current = self.current?;
        Some(CurrentConditions {
            temp_c: current.temp_c,
            feelslike_c: current.feelslike_c,
            condition_text: current.condition.text.trim().to_string(),
            condition_code: current.condition.code,
            humidity: current.humidity,
            wind_kph: current.wind_kph,
            is_day: current.is_day == 1,
            last_updated: current.last_updated,
            location: self.location,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_current_response() {
        let json = r#"{
            "location": {"name": "Kochi", "region": "Kerala", "country": "India", "lat": 9.97, "lon": 76.23},
            "current": {
                "last_updated": "2026-10-19 14:30",
                "temp_c": 30.2,
                "is_day": 1,
                "condition": {"text": "Partly cloudy ", "icon": "//cdn.weatherapi.com/116.png", "code": 1003},
                "wind_kph": 11.2,
                "humidity": 70,
                "feelslike_c": 35.1
            }
        }"#;
        let response: ApiResponse = serde_json::from_str(json).unwrap();
        let conditions = response.into_conditions().unwrap();

        assert!((conditions.temp_c - 30.2).abs() < f64::EPSILON);
        assert_eq!(conditions.condition_text, "Partly cloudy");
        assert_eq!(conditions.condition_code, Some(1003));
        assert!(conditions.is_day);
        assert_eq!(conditions.location.unwrap().name, "Kochi");
    }

    #[test]
    fn test_missing_current_block() {
        let response: ApiResponse = serde_json::from_str(r#"{"location": null}"#).unwrap();
        assert!(response.into_conditions().is_none());
    }

    #[test]
    fn test_parse_error_body() {
        let json = r#"{"error": {"code": 2006, "message": "API key is invalid."}}"#;
        let body: ApiErrorResponse = serde_json::from_str(json).unwrap();
        assert_eq!(body.error.code, 2006);
        assert_eq!(body.error.message, "API key is invalid.");
    }
}
