//! Home screen header

use application::{HomeSummary, WeatherBadge};
use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use validator::Validate;

use super::common::origin_from;
use crate::{error::ApiError, middleware::ValidatedQuery, state::AppState};

/// Optional position for the header
#[derive(Debug, Default, Deserialize, Validate)]
pub struct HomeQuery {
    #[validate(range(min = -90.0, max = 90.0, message = "must be between -90 and 90"))]
    pub lat: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0, message = "must be between -180 and 180"))]
    pub lon: Option<f64>,
}

/// Header content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomeResponse {
    pub address_line: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather: Option<WeatherBadge>,
    /// Weather text, or the loading placeholder
    pub weather_line: String,
}

impl From<HomeSummary> for HomeResponse {
    fn from(summary: HomeSummary) -> Self {
        let weather_line = summary.weather_line();
        Self {
            address_line: summary.address_line,
            weather: summary.weather,
            weather_line,
        }
    }
}

/// Address and weather for the rider's position
#[instrument(skip(state, query))]
pub async fn home_summary(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<HomeQuery>,
) -> Result<Json<HomeResponse>, ApiError> {
    let summary = match origin_from(query.lat, query.lon)? {
        Some(origin) => state.home_service.summary_for(&origin).await,
        None => state.home_service.summary_from_device().await?,
    };
    Ok(Json(summary.into()))
}
