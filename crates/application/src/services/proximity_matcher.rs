//! Proximity matching
//!
//! Pure functions that pick the transit records relevant to a rider. Two
//! strategies exist: exact city-token matching against the reverse-geocoded
//! address, and ranking every located record by great-circle distance.

use std::{fmt, str::FromStr};

use domain::{AddressFragments, Coordinate, MatchResult, TransitRecord, haversine_km};
use serde::{Deserialize, Serialize};

/// Matching strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Keep records whose service area shares a token with the address
    #[default]
    CityToken,
    /// Rank located records by distance from the origin
    DistanceSort,
}

impl MatchMode {
    /// Stable identifier used in query strings and config
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CityToken => "city_token",
            Self::DistanceSort => "distance_sort",
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "city" | "city_token" | "city-token" => Ok(Self::CityToken),
            "distance" | "distance_sort" | "distance-sort" => Ok(Self::DistanceSort),
            other => Err(format!(
                "unknown match mode '{other}', expected 'city_token' or 'distance_sort'"
            )),
        }
    }
}

/// Select the records relevant to a rider
///
/// `CityToken` keeps records whose service area contains at least one token
/// of `address`, preserving directory order; records without a service area
/// never match and a missing address yields nothing.
///
/// `DistanceSort` drops records without a current location and orders the
/// rest ascending by distance from `origin`; ties keep directory order.
/// A missing origin yields nothing.
#[must_use]
pub fn match_records(
    address: Option<&AddressFragments>,
    origin: Option<&Coordinate>,
    directory: &[TransitRecord],
    mode: MatchMode,
) -> Vec<MatchResult> {
    match mode {
        MatchMode::CityToken => address
            .map(|fragments| match_by_city_token(fragments, directory))
            .unwrap_or_default(),
        MatchMode::DistanceSort => origin
            .map(|origin| sort_by_distance(origin, directory))
            .unwrap_or_default(),
    }
}

fn match_by_city_token(address: &AddressFragments, directory: &[TransitRecord]) -> Vec<MatchResult> {
    if address.is_empty() {
        return Vec::new();
    }

    directory
        .iter()
        .filter(|record| address.shares_token_with(record.service_area_cities()))
        .cloned()
        .map(MatchResult::unranked)
        .collect()
}

fn sort_by_distance(origin: &Coordinate, directory: &[TransitRecord]) -> Vec<MatchResult> {
    let mut ranked: Vec<MatchResult> = directory
        .iter()
        .filter_map(|record| {
            let location = record.current_location()?;
            Some(MatchResult::ranked(
                record.clone(),
                haversine_km(origin, &location),
            ))
        })
        .collect();

    // sort_by is stable, so equal distances keep directory order
    ranked.sort_by(|a, b| {
        let left = a.distance_km.unwrap_or(f64::INFINITY);
        let right = b.distance_km.unwrap_or(f64::INFINITY);
        left.total_cmp(&right)
    });
    ranked
}
