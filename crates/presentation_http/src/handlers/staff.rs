//! Staff location share

use application::StaffProfile;
use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{error::ApiError, state::AppState};

/// Share message for the staff's current position
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffShareResponse {
    pub staff: StaffProfile,
    pub message: String,
}

/// Compose the share text from the device position
#[instrument(skip(state))]
pub async fn share_location(
    State(state): State<AppState>,
) -> Result<Json<StaffShareResponse>, ApiError> {
    let message = state.staff_service.share_current_location().await?;
    Ok(Json(StaffShareResponse {
        staff: state.staff_service.profile().clone(),
        message,
    }))
}
