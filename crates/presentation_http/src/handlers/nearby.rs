//! Nearby buses and stops

use std::str::FromStr;

use application::{DirectoryCollection, MatchMode, NearbyOutcome};
use axum::{Json, extract::State};
use domain::MatchResult;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use validator::Validate;

use super::common::{CoordinateView, RecordView, origin_from};
use crate::{error::ApiError, middleware::ValidatedQuery, state::AppState};

/// Query for the nearby endpoints
///
/// Without `lat`/`lon` the device position is used.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct NearbyQuery {
    #[validate(range(min = -90.0, max = 90.0, message = "must be between -90 and 90"))]
    pub lat: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0, message = "must be between -180 and 180"))]
    pub lon: Option<f64>,
    /// `city_token` (default) or `distance_sort`
    pub mode: Option<String>,
}

impl NearbyQuery {
    fn match_mode(&self) -> Result<MatchMode, ApiError> {
        self.mode
            .as_deref()
            .map_or(Ok(MatchMode::default()), MatchMode::from_str)
            .map_err(ApiError::BadRequest)
    }
}

/// One match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchView {
    #[serde(flatten)]
    pub record: RecordView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

impl From<&MatchResult> for MatchView {
    fn from(result: &MatchResult) -> Self {
        Self {
            record: RecordView::from(&result.record),
            distance_km: result.distance_km,
        }
    }
}

/// Nearby lookup response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearbyResponse {
    pub origin: CoordinateView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub mode: MatchMode,
    pub count: usize,
    pub results: Vec<MatchView>,
}

impl From<NearbyOutcome> for NearbyResponse {
    fn from(outcome: NearbyOutcome) -> Self {
        Self {
            origin: outcome.origin.into(),
            address: outcome.address,
            mode: outcome.mode,
            count: outcome.results.len(),
            results: outcome.results.iter().map(MatchView::from).collect(),
        }
    }
}

/// Buses around the rider
pub async fn nearby_buses(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<NearbyQuery>,
) -> Result<Json<NearbyResponse>, ApiError> {
    nearby(&state, DirectoryCollection::Buses, &query).await
}

/// Stops around the rider
pub async fn nearby_stops(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<NearbyQuery>,
) -> Result<Json<NearbyResponse>, ApiError> {
    nearby(&state, DirectoryCollection::BusStops, &query).await
}

#[instrument(skip(state, query), fields(collection = %collection))]
async fn nearby(
    state: &AppState,
    collection: DirectoryCollection,
    query: &NearbyQuery,
) -> Result<Json<NearbyResponse>, ApiError> {
    let mode = query.match_mode()?;
    let outcome = match origin_from(query.lat, query.lon)? {
        Some(origin) => {
            state
                .nearby_service
                .nearby_from(origin, collection, mode)
                .await?
        },
        None => {
            state
                .nearby_service
                .nearby_from_device(collection, mode)
                .await?
        },
    };
    Ok(Json(outcome.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_defaults_to_city_token() {
        let query = NearbyQuery::default();
        assert_eq!(query.match_mode().unwrap(), MatchMode::CityToken);
    }

    #[test]
    fn mode_is_parsed() {
        let query = NearbyQuery {
            mode: Some("distance".to_string()),
            ..NearbyQuery::default()
        };
        assert_eq!(query.match_mode().unwrap(), MatchMode::DistanceSort);
    }

    #[test]
    fn unknown_mode_is_bad_request() {
        let query = NearbyQuery {
            mode: Some("nearest-ish".to_string()),
            ..NearbyQuery::default()
        };
        assert!(matches!(query.match_mode(), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn validation_catches_out_of_range_latitude() {
        let query = NearbyQuery {
            lat: Some(123.0),
            lon: Some(76.0),
            mode: None,
        };
        assert!(query.validate().is_err());
    }
}
