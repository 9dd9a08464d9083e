//! Response views and query helpers shared by the handlers

use domain::{Coordinate, TransitRecord};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// A coordinate in responses
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinateView {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<Coordinate> for CoordinateView {
    fn from(coordinate: Coordinate) -> Self {
        Self {
            latitude: coordinate.latitude(),
            longitude: coordinate.longitude(),
        }
    }
}

/// A bus or stop in responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordView {
    pub id: String,
    pub kind: String,
    pub name: String,
    pub cities: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<CoordinateView>,
    pub occupancy: String,
    pub operational: String,
}

impl From<&TransitRecord> for RecordView {
    fn from(record: &TransitRecord) -> Self {
        Self {
            id: record.id().to_string(),
            kind: record.kind().to_string(),
            name: record.name().to_string(),
            cities: record.service_area_cities().iter().cloned().collect(),
            location: record.current_location().map(CoordinateView::from),
            occupancy: record.occupancy().to_string(),
            operational: record.operational().to_string(),
        }
    }
}

/// Explicit origin from `lat`/`lon`, `None` when both are absent
pub(crate) fn origin_from(lat: Option<f64>, lon: Option<f64>) -> Result<Option<Coordinate>, ApiError> {
    match (lat, lon) {
        (Some(lat), Some(lon)) => Coordinate::new(lat, lon)
            .map(Some)
            .map_err(|e| ApiError::BadRequest(e.to_string())),
        (None, None) => Ok(None),
        _ => Err(ApiError::BadRequest(
            "lat and lon must be given together".to_string(),
        )),
    }
}
