//! Tracking events port
//!
//! The live tracker reports through this port instead of touching any
//! user interface directly. Presentation layers decide how to surface an
//! update, an alert (vibration, bell, toast) or a notice.

use std::fmt;

use domain::{ProximityAlert, TrackingSession};
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

/// Non-fatal conditions raised while tracking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "detail")]
pub enum TrackingNotice {
    /// Location access refused; tracking cannot compute a distance
    PermissionDenied,
    /// The device could not produce a position this cycle
    UserLocationUnavailable(String),
    /// The bus position could not be fetched this cycle
    BusLocationUnavailable(String),
}

impl TrackingNotice {
    /// Short message suitable for a toast or status line
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::PermissionDenied => "Permission to access location was denied",
            Self::UserLocationUnavailable(_) => "Unable to fetch your location",
            Self::BusLocationUnavailable(_) => "Unable to fetch bus location",
        }
    }
}

impl fmt::Display for TrackingNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PermissionDenied => f.write_str(self.message()),
            Self::UserLocationUnavailable(detail) | Self::BusLocationUnavailable(detail) => {
                write!(f, "{}: {detail}", self.message())
            },
        }
    }
}

/// Sink for tracking session events
///
/// Called from the polling task while the session lock is held, so
/// implementations must return quickly. The lock is re-entrant: reading the
/// session or cancelling it through the tracking handle is allowed here.
#[cfg_attr(test, automock)]
pub trait TrackingEventsPort: Send + Sync {
    /// Distance or phase changed
    fn on_update(&self, session: &TrackingSession);

    /// The bus came within the alert threshold (at most once per session)
    fn on_proximity_alert(&self, alert: &ProximityAlert);

    /// Something went wrong this cycle; polling continues
    fn on_notice(&self, notice: &TrackingNotice);
}
