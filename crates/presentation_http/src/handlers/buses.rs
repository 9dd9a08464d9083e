//! Bus details and tracking snapshots

use application::{format_distance, format_eta, format_session_status, locate_device};
use axum::{
    Json,
    extract::{Path, State},
};
use domain::{TrackingSession, TransitId, TransitRecord};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use validator::Validate;

use super::common::{CoordinateView, RecordView, origin_from};
use crate::{error::ApiError, middleware::ValidatedQuery, state::AppState};

/// Optional rider position for a snapshot
#[derive(Debug, Default, Deserialize, Validate)]
pub struct SnapshotQuery {
    #[validate(range(min = -90.0, max = 90.0, message = "must be between -90 and 90"))]
    pub lat: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0, message = "must be between -180 and 180"))]
    pub lon: Option<f64>,
}

/// Distance and ETA between the rider and one bus
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingSnapshotResponse {
    pub bus: RecordView,
    pub user: CoordinateView,
    pub distance_km: f64,
    pub eta_minutes: f64,
    /// Distance for display ("150 meters", "2.35 km")
    pub distance: String,
    /// ETA for display ("6 minutes", "1.25 hours")
    pub eta: String,
    pub within_alert_threshold: bool,
    pub status: String,
}

fn parse_id(raw: String) -> Result<TransitId, ApiError> {
    TransitId::new(raw).map_err(|e| ApiError::BadRequest(e.to_string()))
}

async fn fetch_bus(state: &AppState, id: &TransitId) -> Result<TransitRecord, ApiError> {
    state
        .directory
        .get_bus(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Bus not found: {id}")))
}

/// Current directory record of one bus
#[instrument(skip(state))]
pub async fn get_bus(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RecordView>, ApiError> {
    let id = parse_id(id)?;
    let bus = fetch_bus(&state, &id).await?;
    Ok(Json(RecordView::from(&bus)))
}

/// One tracking step: read both positions once and report distance/ETA
#[instrument(skip(state, query))]
pub async fn tracking_snapshot(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedQuery(query): ValidatedQuery<SnapshotQuery>,
) -> Result<Json<TrackingSnapshotResponse>, ApiError> {
    let id = parse_id(id)?;
    let user = match origin_from(query.lat, query.lon)? {
        Some(origin) => origin,
        None => locate_device(state.location.as_ref()).await?,
    };

    let bus = fetch_bus(&state, &id).await?;
    let bus_position = bus
        .current_location()
        .ok_or_else(|| ApiError::ServiceUnavailable("Unable to fetch bus location".to_string()))?;

    let mut session = TrackingSession::new(id);
    session
        .begin()
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    session.update_user_coordinate(user, &state.policy);
    let alert = session.record_bus_coordinate(bus_position, &state.policy);

    let (Some(distance_km), Some(eta_minutes)) = (session.distance_km(), session.eta_minutes())
    else {
        return Err(ApiError::Internal(
            "tracking session produced no estimate".to_string(),
        ));
    };
    debug!(distance_km, eta_minutes, alert = alert.is_some(), "Tracking snapshot");

    Ok(Json(TrackingSnapshotResponse {
        bus: RecordView::from(&bus),
        user: user.into(),
        distance_km,
        eta_minutes,
        distance: format_distance(distance_km),
        eta: format_eta(eta_minutes),
        within_alert_threshold: alert.is_some(),
        status: format_session_status(&session),
    }))
}
