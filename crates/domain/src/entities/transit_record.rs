//! Transit directory record entity
//!
//! A bus or bus stop as published by the directory source. The core only
//! ever reads snapshots of these records.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value_objects::{Coordinate, TransitId, normalize_token};

/// Which kind of directory record this is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// A bus; its coordinate is the live position reported by staff
    Bus,
    /// A fixed bus stop
    Stop,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus => write!(f, "bus"),
            Self::Stop => write!(f, "stop"),
        }
    }
}

/// Passenger-load classification of a bus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OccupancyState {
    /// Standing room only
    Overcrowded,
    /// All seats taken
    FullySeated,
    /// Seats available
    LessBusy,
    /// Not reported
    #[default]
    Unknown,
}

impl OccupancyState {
    /// Parse a free-form label as written by the admin panel and staff app
    ///
    /// Accepts both the current labels and the older seat-status wording
    /// ("Available", "Partially Filled", "Filled"). Anything else is `Unknown`.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let normalized: String = label
            .trim()
            .to_lowercase()
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .collect();
        match normalized.as_str() {
            "overcrowded" | "crowded" | "filled" | "full" => Self::Overcrowded,
            "fullyseated" | "partiallyfilled" => Self::FullySeated,
            "lessbusy" | "available" | "empty" => Self::LessBusy,
            _ => Self::Unknown,
        }
    }

    /// Human-readable label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Overcrowded => "Overcrowded",
            Self::FullySeated => "Fully Seated",
            Self::LessBusy => "Less Busy",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for OccupancyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Service state of a bus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationalState {
    /// In service and on time
    Running,
    /// In service, behind schedule
    Delayed,
    /// Out of service
    Breakdown,
    /// Not reported
    #[default]
    Unknown,
}

impl OperationalState {
    /// Parse a free-form status label; anything unrecognized is `Unknown`
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let normalized: String = label
            .trim()
            .to_lowercase()
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .collect();
        match normalized.as_str() {
            "running" | "ontime" | "active" => Self::Running,
            "delayed" | "late" => Self::Delayed,
            "breakdown" | "brokendown" | "outofservice" => Self::Breakdown,
            _ => Self::Unknown,
        }
    }

    /// Human-readable label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Running => "Running",
            Self::Delayed => "Delayed",
            Self::Breakdown => "Breakdown",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for OperationalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A bus or stop in the transit directory
///
/// Cities are matched against single address tokens, so a multi-word city
/// such as "Fort Kochi" is kept but can never match. See
/// [`TransitRecord::multi_word_cities`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitRecord {
    /// Stable identifier assigned by the directory source
    id: TransitId,
    /// Bus or stop
    kind: RecordKind,
    /// Display name
    name: String,
    /// Lower-cased city names this record serves
    service_area_cities: BTreeSet<String>,
    /// Live position for buses, fixed position for stops
    current_location: Option<Coordinate>,
    /// Passenger load (buses only)
    occupancy: OccupancyState,
    /// Service state (buses only)
    operational: OperationalState,
}

impl TransitRecord {
    /// Create a record with no cities, location or status
    #[must_use]
    pub fn new(id: TransitId, kind: RecordKind, name: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            name: name.into(),
            service_area_cities: BTreeSet::new(),
            current_location: None,
            occupancy: OccupancyState::Unknown,
            operational: OperationalState::Unknown,
        }
    }

    /// Create a bus record
    #[must_use]
    pub fn bus(id: TransitId, name: impl Into<String>) -> Self {
        Self::new(id, RecordKind::Bus, name)
    }

    /// Create a stop record
    #[must_use]
    pub fn stop(id: TransitId, name: impl Into<String>) -> Self {
        Self::new(id, RecordKind::Stop, name)
    }

    /// Set the served cities; names are normalized and blanks dropped
    #[must_use]
    pub fn with_cities<I, S>(mut self, cities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.service_area_cities = cities
            .into_iter()
            .map(|c| normalize_token(c.as_ref()))
            .filter(|c| !c.is_empty())
            .collect();
        self
    }

    /// Set the current location
    #[must_use]
    pub const fn with_location(mut self, location: Coordinate) -> Self {
        self.current_location = Some(location);
        self
    }

    /// Set the occupancy state
    #[must_use]
    pub const fn with_occupancy(mut self, occupancy: OccupancyState) -> Self {
        self.occupancy = occupancy;
        self
    }

    /// Set the operational state
    #[must_use]
    pub const fn with_operational(mut self, operational: OperationalState) -> Self {
        self.operational = operational;
        self
    }

    /// Get the identifier
    #[must_use]
    pub const fn id(&self) -> &TransitId {
        &self.id
    }

    /// Get the record kind
    #[must_use]
    pub const fn kind(&self) -> RecordKind {
        self.kind
    }

    /// Get the display name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the normalized service-area cities
    #[must_use]
    pub const fn service_area_cities(&self) -> &BTreeSet<String> {
        &self.service_area_cities
    }

    /// Whether any city is configured; records without one never match
    #[must_use]
    pub fn has_service_area(&self) -> bool {
        !self.service_area_cities.is_empty()
    }

    /// Served cities containing whitespace, unreachable by token matching
    pub fn multi_word_cities(&self) -> impl Iterator<Item = &str> {
        self.service_area_cities
            .iter()
            .map(String::as_str)
            .filter(|city| city.contains(char::is_whitespace))
    }

    /// Get the current location, if one has been reported
    #[must_use]
    pub const fn current_location(&self) -> Option<Coordinate> {
        self.current_location
    }

    /// Get the occupancy state
    #[must_use]
    pub const fn occupancy(&self) -> OccupancyState {
        self.occupancy
    }

    /// Get the operational state
    #[must_use]
    pub const fn operational(&self) -> OperationalState {
        self.operational
    }
}
