//! Tracking display formatting
//!
//! Pure functions turning distances, ETAs and session state into the short
//! strings shown on a tracking screen or printed by the CLI.

use domain::{MatchResult, TrackingPhase, TrackingSession};

/// Format a distance: whole meters below one kilometer, otherwise km with two decimals
#[must_use]
pub fn format_distance(distance_km: f64) -> String {
    if distance_km < 1.0 {
        format!("{:.0} meters", distance_km * 1000.0)
    } else {
        format!("{distance_km:.2} km")
    }
}

/// Format an ETA: whole minutes below one hour, otherwise hours with two decimals
#[must_use]
pub fn format_eta(eta_minutes: f64) -> String {
    if eta_minutes < 60.0 {
        format!("{eta_minutes:.0} minutes")
    } else {
        format!("{:.2} hours", eta_minutes / 60.0)
    }
}

/// One-line status for a tracking session
#[must_use]
pub fn format_session_status(session: &TrackingSession) -> String {
    match (session.phase(), session.distance_km(), session.eta_minutes()) {
        (TrackingPhase::Stopped, _, _) => format!("Stopped tracking {}", session.tracked_id()),
        (TrackingPhase::Tracking, Some(distance), Some(eta)) => {
            let alert = if session.alert_fired() {
                " 🔔"
            } else {
                ""
            };
            format!(
                "🚌 {}: {} away, arriving in about {}{alert}",
                session.tracked_id(),
                format_distance(distance),
                format_eta(eta)
            )
        },
        _ => "Fetching location...".to_string(),
    }
}

/// One line per match: name, optional distance, occupancy and status
#[must_use]
pub fn format_match_line(result: &MatchResult) -> String {
    let record = &result.record;
    let distance = result
        .distance_km
        .map(|d| format!(" ({})", format_distance(d)))
        .unwrap_or_default();
    format!(
        "{} [{}]{distance} · {} · {}",
        record.name(),
        record.id(),
        record.occupancy(),
        record.operational()
    )
}
