//! Proximity match result

use serde::{Deserialize, Serialize};

use super::TransitRecord;

/// A directory record selected as relevant to the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// The matched record
    pub record: TransitRecord,
    /// Great-circle distance from the user, when distance-sorted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

impl MatchResult {
    /// A match without distance information
    #[must_use]
    pub const fn unranked(record: TransitRecord) -> Self {
        Self {
            record,
            distance_km: None,
        }
    }

    /// A match with its distance from the user
    #[must_use]
    pub const fn ranked(record: TransitRecord, distance_km: f64) -> Self {
        Self {
            record,
            distance_km: Some(distance_km),
        }
    }
}
