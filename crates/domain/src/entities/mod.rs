//! Domain entities - Objects with identity and lifecycle

mod match_result;
mod tracking_session;
mod transit_record;

pub use match_result::MatchResult;
pub use tracking_session::{
    DEFAULT_ALERT_THRESHOLD_KM, DEFAULT_AVERAGE_SPEED_KMH, ProximityAlert, TrackingPhase,
    TrackingPolicy, TrackingSession,
};
pub use transit_record::{OccupancyState, OperationalState, RecordKind, TransitRecord};
