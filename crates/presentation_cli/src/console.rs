//! Terminal output for live tracking

use application::{TrackingEventsPort, TrackingNotice, format_distance, format_eta, format_session_status};
use domain::{ProximityAlert, TrackingSession};
use parking_lot::Mutex;

/// ASCII bell, the terminal's stand-in for a vibration
const BELL: char = '\u{7}';

/// Alert text for a bus that came within the threshold
pub fn alert_line(alert: &ProximityAlert) -> String {
    format!(
        "{BELL}🔔 Bus {} is {} away, arriving in about {}",
        alert.tracked_id,
        format_distance(alert.distance_km),
        format_eta(alert.eta_minutes)
    )
}

/// Warning text for a non-fatal tracking problem
pub fn notice_line(notice: &TrackingNotice) -> String {
    format!("⚠️  {notice}")
}

/// Prints tracking events to stdout, skipping repeated status lines
#[derive(Debug, Default)]
pub struct ConsoleEvents {
    last_status: Mutex<Option<String>>,
}

impl ConsoleEvents {
    /// Remember `line`; false if it equals the previous one
    fn is_new_status(&self, line: &str) -> bool {
        let mut last = self.last_status.lock();
        if last.as_deref() == Some(line) {
            return false;
        }
        *last = Some(line.to_string());
        true
    }
}

impl TrackingEventsPort for ConsoleEvents {
    fn on_update(&self, session: &TrackingSession) {
        let line = format_session_status(session);
        if self.is_new_status(&line) {
            println!("{line}");
        }
    }

    fn on_proximity_alert(&self, alert: &ProximityAlert) {
        println!("{}", alert_line(alert));
    }

    fn on_notice(&self, notice: &TrackingNotice) {
        println!("{}", notice_line(notice));
    }
}
