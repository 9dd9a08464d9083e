//! Application services - Use case implementations

mod home_summary_service;
mod live_tracker;
mod nearby_service;
mod proximity_matcher;
mod staff_share_service;
mod tracking_formatter;

pub use home_summary_service::{
    ADDRESS_PARTS, FALLBACK_WEATHER_ICON, HomeSummary, HomeSummaryService, LOADING_PLACEHOLDER,
    UNKNOWN_LOCATION, WeatherBadge, summarize_address, weather_icon,
};
pub use live_tracker::{DEFAULT_POLL_INTERVAL, LiveTracker, TrackingConfig, TrackingHandle};
pub use nearby_service::{NearbyOutcome, NearbyService};
pub use proximity_matcher::{MatchMode, match_records};
pub use staff_share_service::{
    LOCATION_REQUIRED_MESSAGE, StaffProfile, StaffShareService, compose_share_message,
};
pub use tracking_formatter::{format_distance, format_eta, format_match_line, format_session_status};
