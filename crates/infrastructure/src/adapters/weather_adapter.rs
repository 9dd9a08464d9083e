//! Weather adapter - Implements WeatherPort using integration_weather

use std::sync::Arc;

use application::error::ApplicationError;
use application::ports::{CurrentWeather, WeatherPort};
use async_trait::async_trait;
use domain::Coordinate;
use integration_weather::{
    CurrentConditions, WeatherApiClient, WeatherClient, WeatherConfig, WeatherError,
};
use tracing::{debug, instrument};

/// Adapter for current conditions from WeatherAPI.com
pub struct WeatherAdapter {
    client: Arc<dyn WeatherClient>,
}

impl std::fmt::Debug for WeatherAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherAdapter")
            .field("client", &"WeatherClient")
            .finish()
    }
}

impl WeatherAdapter {
    /// Create an adapter with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing or the HTTP client fails to initialize.
    pub fn new(config: &WeatherConfig) -> Result<Self, ApplicationError> {
        let client = WeatherApiClient::new(config).map_err(Self::map_error)?;
        Ok(Self::with_client(Arc::new(client)))
    }

    /// Create an adapter over any weather client
    #[must_use]
    pub fn with_client(client: Arc<dyn WeatherClient>) -> Self {
        Self { client }
    }

    /// Map integration weather error to application error
    fn map_error(err: WeatherError) -> ApplicationError {
        match err {
            WeatherError::ConnectionFailed(e) => ApplicationError::Unavailable(e),
            WeatherError::RequestFailed(e)
            | WeatherError::ParseError(e)
            | WeatherError::ServiceUnavailable(e) => ApplicationError::ExternalService(e),
            WeatherError::Unauthorized(e) => ApplicationError::Configuration(e),
            WeatherError::InvalidCoordinates => {
                ApplicationError::InvalidOperation("Invalid coordinates".into())
            },
            WeatherError::RateLimitExceeded => ApplicationError::RateLimited,
        }
    }

    /// Convert integration conditions to the application's weather snapshot
    fn map_current(current: CurrentConditions) -> CurrentWeather {
        CurrentWeather {
            temp_c: current.temp_c,
            condition_text: current.condition_text,
            location_name: current.location.map(|location| location.name),
        }
    }
}

#[async_trait]
impl WeatherPort for WeatherAdapter {
    #[instrument(skip(self), fields(lat = location.latitude(), lon = location.longitude()))]
    async fn current_weather(
        &self,
        location: &Coordinate,
    ) -> Result<CurrentWeather, ApplicationError> {
        let result = self
            .client
            .get_current(location.latitude(), location.longitude())
            .await
            .map_err(Self::map_error);

        match &result {
            Ok(current) => {
                debug!(
                    temp_c = current.temp_c,
                    condition = %current.condition_text,
                    "Retrieved current weather"
                );
            },
            Err(e) => {
                debug!(error = %e, "Failed to get current weather");
            },
        }

        result.map(Self::map_current)
    }

    #[instrument(skip(self))]
    async fn is_available(&self) -> bool {
        self.client.is_healthy().await
    }
}
