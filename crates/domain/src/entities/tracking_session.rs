//! Live tracking session entity
//!
//! Holds the per-session state of a bus being tracked: last known user and bus
//! positions, derived distance/ETA, and the one-shot proximity alert latch.
//! The state machine is `Idle -> AwaitingFirstFix -> Tracking -> Stopped`.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::DomainError;
use crate::value_objects::{Coordinate, TransitId, haversine_km};

/// Default assumed average bus speed
pub const DEFAULT_AVERAGE_SPEED_KMH: f64 = 40.0;

/// Default distance at which the proximity alert fires
pub const DEFAULT_ALERT_THRESHOLD_KM: f64 = 0.2;

/// Lifecycle phase of a tracking session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingPhase {
    /// Created, nothing requested yet
    Idle,
    /// Waiting for both a user and a bus coordinate
    AwaitingFirstFix,
    /// Both coordinates known; distance and ETA are live
    Tracking,
    /// Terminal; no further updates are accepted
    Stopped,
}

impl fmt::Display for TrackingPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Idle => "idle",
            Self::AwaitingFirstFix => "awaiting_first_fix",
            Self::Tracking => "tracking",
            Self::Stopped => "stopped",
        };
        write!(f, "{label}")
    }
}

/// Distance/ETA parameters applied on every fix
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackingPolicy {
    average_speed_kmh: f64,
    alert_threshold_km: f64,
}

impl TrackingPolicy {
    /// Create a policy
    ///
    /// # Errors
    ///
    /// Returns a validation error if the speed is not strictly positive or the
    /// threshold is negative.
    pub fn new(average_speed_kmh: f64, alert_threshold_km: f64) -> Result<Self, DomainError> {
        if !(average_speed_kmh.is_finite() && average_speed_kmh > 0.0) {
            return Err(DomainError::ValidationError(format!(
                "average speed must be positive, got {average_speed_kmh}"
            )));
        }
        if !(alert_threshold_km.is_finite() && alert_threshold_km >= 0.0) {
            return Err(DomainError::ValidationError(format!(
                "alert threshold must be non-negative, got {alert_threshold_km}"
            )));
        }
        Ok(Self {
            average_speed_kmh,
            alert_threshold_km,
        })
    }

    /// Assumed average speed in km/h
    #[must_use]
    pub const fn average_speed_kmh(&self) -> f64 {
        self.average_speed_kmh
    }

    /// Alert distance in km
    #[must_use]
    pub const fn alert_threshold_km(&self) -> f64 {
        self.alert_threshold_km
    }

    /// Minutes needed to cover `distance_km` at the average speed
    #[must_use]
    pub fn eta_minutes(&self, distance_km: f64) -> f64 {
        (distance_km / self.average_speed_kmh) * 60.0
    }
}

impl Default for TrackingPolicy {
    fn default() -> Self {
        Self {
            average_speed_kmh: DEFAULT_AVERAGE_SPEED_KMH,
            alert_threshold_km: DEFAULT_ALERT_THRESHOLD_KM,
        }
    }
}

/// Raised once per session when the bus first comes within the alert threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProximityAlert {
    /// The tracked bus
    pub tracked_id: TransitId,
    /// Distance at the moment the alert fired
    pub distance_km: f64,
    /// ETA at the moment the alert fired
    pub eta_minutes: f64,
}

/// Per-session tracking state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingSession {
    id: Uuid,
    tracked_id: TransitId,
    phase: TrackingPhase,
    last_user_coordinate: Option<Coordinate>,
    last_bus_coordinate: Option<Coordinate>,
    distance_km: Option<f64>,
    eta_minutes: Option<f64>,
    alert_fired: bool,
    started_at: DateTime<Utc>,
    last_fix_at: Option<DateTime<Utc>>,
}

impl TrackingSession {
    /// Create an idle session for the given bus
    #[must_use]
    pub fn new(tracked_id: TransitId) -> Self {
        Self {
            id: Uuid::new_v4(),
            tracked_id,
            phase: TrackingPhase::Idle,
            last_user_coordinate: None,
            last_bus_coordinate: None,
            distance_km: None,
            eta_minutes: None,
            alert_fired: false,
            started_at: Utc::now(),
            last_fix_at: None,
        }
    }

    /// Start waiting for coordinates
    ///
    /// # Errors
    ///
    /// Returns an error if the session has already been stopped.
    pub fn begin(&mut self) -> Result<(), DomainError> {
        match self.phase {
            TrackingPhase::Stopped => Err(DomainError::InvalidState(format!(
                "tracking session {} is stopped",
                self.id
            ))),
            TrackingPhase::Idle => {
                self.phase = TrackingPhase::AwaitingFirstFix;
                Ok(())
            },
            TrackingPhase::AwaitingFirstFix | TrackingPhase::Tracking => Ok(()),
        }
    }

    /// Record the user's latest coordinate and re-evaluate distance
    ///
    /// Ignored once stopped.
    pub fn update_user_coordinate(
        &mut self,
        coordinate: Coordinate,
        policy: &TrackingPolicy,
    ) -> Option<ProximityAlert> {
        if self.is_stopped() {
            return None;
        }
        self.last_user_coordinate = Some(coordinate);
        self.refresh(policy)
    }

    /// Record the bus's latest coordinate and re-evaluate distance
    ///
    /// Ignored once stopped.
    pub fn record_bus_coordinate(
        &mut self,
        coordinate: Coordinate,
        policy: &TrackingPolicy,
    ) -> Option<ProximityAlert> {
        if self.is_stopped() {
            return None;
        }
        self.last_bus_coordinate = Some(coordinate);
        self.refresh(policy)
    }

    /// Enter the terminal phase
    pub fn stop(&mut self) {
        self.phase = TrackingPhase::Stopped;
    }

    fn refresh(&mut self, policy: &TrackingPolicy) -> Option<ProximityAlert> {
        if self.phase == TrackingPhase::Idle {
            self.phase = TrackingPhase::AwaitingFirstFix;
        }
        let (Some(user), Some(bus)) = (self.last_user_coordinate, self.last_bus_coordinate) else {
            return None;
        };
        self.phase = TrackingPhase::Tracking;
        self.apply_distance(haversine_km(&user, &bus), policy)
    }

    fn apply_distance(&mut self, distance_km: f64, policy: &TrackingPolicy) -> Option<ProximityAlert> {
        let eta_minutes = policy.eta_minutes(distance_km);
        self.distance_km = Some(distance_km);
        self.eta_minutes = Some(eta_minutes);
        self.last_fix_at = Some(Utc::now());

        if self.alert_fired || distance_km > policy.alert_threshold_km() {
            return None;
        }
        self.alert_fired = true;
        Some(ProximityAlert {
            tracked_id: self.tracked_id.clone(),
            distance_km,
            eta_minutes,
        })
    }

    /// Session identifier
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// The tracked bus
    #[must_use]
    pub const fn tracked_id(&self) -> &TransitId {
        &self.tracked_id
    }

    /// Current phase
    #[must_use]
    pub const fn phase(&self) -> TrackingPhase {
        self.phase
    }

    /// Last known user coordinate
    #[must_use]
    pub const fn last_user_coordinate(&self) -> Option<Coordinate> {
        self.last_user_coordinate
    }

    /// Last known bus coordinate
    #[must_use]
    pub const fn last_bus_coordinate(&self) -> Option<Coordinate> {
        self.last_bus_coordinate
    }

    /// Distance between user and bus, once both are known
    #[must_use]
    pub const fn distance_km(&self) -> Option<f64> {
        self.distance_km
    }

    /// Estimated minutes until the bus arrives, once both are known
    #[must_use]
    pub const fn eta_minutes(&self) -> Option<f64> {
        self.eta_minutes
    }

    /// Whether the proximity alert has already fired
    #[must_use]
    pub const fn alert_fired(&self) -> bool {
        self.alert_fired
    }

    /// When the session was created
    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// When distance was last recomputed
    #[must_use]
    pub const fn last_fix_at(&self) -> Option<DateTime<Utc>> {
        self.last_fix_at
    }

    /// Whether the session is terminal
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.phase == TrackingPhase::Stopped
    }
}
