//! Smart Transit CLI
//!
//! Terminal front end for riders and staff: buses and stops near you, live
//! tracking of one bus, the home header and the staff location share.

#![allow(clippy::print_stdout)]

mod console;

use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context;
use application::{
    DirectoryCollection, HomeSummaryService, LiveTracker, MatchMode, NearbyOutcome,
    NearbyService, StaffShareService, WeatherPort, format_match_line, format_session_status,
};
use clap::{Parser, Subcommand, ValueEnum};
use domain::TransitId;
use infrastructure::{Adapters, AppConfig, init_telemetry};
use tracing::debug;

use crate::console::ConsoleEvents;

/// Smart Transit CLI
#[derive(Parser)]
#[command(name = "smart-transit")]
#[command(author, version, about = "Smart Transit commuter bus CLI", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (extension optional)
    #[arg(short, long, default_value = "config", env = "SMART_TRANSIT_CONFIG")]
    config: PathBuf,

    /// Device latitude, overrides the configured position
    #[arg(long, global = true, requires = "lon", allow_negative_numbers = true)]
    lat: Option<f64>,

    /// Device longitude, overrides the configured position
    #[arg(long, global = true, requires = "lat", allow_negative_numbers = true)]
    lon: Option<f64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List buses or stops near you
    Nearby {
        /// What to look for
        #[arg(value_enum, default_value_t = Target::Buses)]
        target: Target,

        /// Matching strategy: city_token or distance_sort
        #[arg(short, long, default_value = "city_token")]
        mode: MatchMode,

        /// Print the raw result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Follow one bus until Ctrl+C
    Track {
        /// Bus identifier
        bus_id: String,

        /// Re-read your position on every poll
        #[arg(long)]
        follow: bool,

        /// Seconds between two polls (default from config)
        #[arg(long)]
        interval: Option<u64>,
    },

    /// Show your address and the current weather
    Home,

    /// Print the staff location share message
    ShareLocation,

    /// Check server health (used by container healthchecks)
    Health {
        /// Server URL
        #[arg(short, long, default_value = "http://localhost:3000")]
        url: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Target {
    Buses,
    Stops,
}

impl From<Target> for DirectoryCollection {
    fn from(target: Target) -> Self {
        match target {
            Target::Buses => Self::Buses,
            Target::Stops => Self::BusStops,
        }
    }
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Format endpoint URL
fn endpoint_url(base_url: &str, path: &str) -> String {
    format!("{}{path}", base_url.trim_end_matches('/'))
}

/// Lines printed for a nearby lookup
fn render_nearby(outcome: &NearbyOutcome, target: Target) -> Vec<String> {
    let noun = match target {
        Target::Buses => "buses",
        Target::Stops => "stops",
    };
    let mut lines = Vec::with_capacity(outcome.results.len() + 2);
    if let Some(address) = &outcome.address {
        lines.push(format!("📍 {address}"));
    }
    if outcome.results.is_empty() {
        lines.push(format!("No {noun} found near you ({})", outcome.mode));
        return lines;
    }
    lines.push(format!(
        "🚌 {} {noun} near you ({})",
        outcome.results.len(),
        outcome.mode
    ));
    lines.extend(
        outcome
            .results
            .iter()
            .map(|result| format!("  {}", format_match_line(result))),
    );
    lines
}

fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let mut config = AppConfig::load_from(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    if let (Some(lat), Some(lon)) = (cli.lat, cli.lon) {
        config.device.latitude = Some(lat);
        config.device.longitude = Some(lon);
    }
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let telemetry = config
        .telemetry
        .clone()
        .with_filter(log_filter_from_verbosity(cli.verbose));
    init_telemetry(&telemetry)?;
    debug!(config = %cli.config.display(), "Configuration loaded");

    if let Commands::Health { url } = &cli.command {
        return check_health(url).await;
    }

    let adapters = Adapters::from_config(&config).context("Failed to initialize adapters")?;

    match cli.command {
        Commands::Nearby { target, mode, json } => {
            let service = NearbyService::new(adapters.location, adapters.directory);
            let outcome = service.nearby_from_device(target.into(), mode).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                for line in render_nearby(&outcome, target) {
                    println!("{line}");
                }
            }
        },

        Commands::Track {
            bus_id,
            follow,
            interval,
        } => {
            let mut tracking = config
                .tracking
                .to_tracking_config()
                .context("Invalid tracking configuration")?;
            tracking.follow_user |= follow;
            if let Some(secs) = interval {
                tracking.poll_interval = Duration::from_secs(secs.max(1));
            }

            let bus_id = TransitId::new(bus_id)?;
            let tracker = LiveTracker::new(adapters.directory, adapters.location, tracking);
            println!("🚌 Tracking {bus_id}, press Ctrl+C to stop");

            let handle = tracker.start(bus_id, Arc::new(ConsoleEvents::default()))?;
            tokio::signal::ctrl_c()
                .await
                .context("Failed to listen for Ctrl+C")?;

            let session = handle.stop().await;
            println!("{}", format_session_status(&session));
        },

        Commands::Home => {
            let weather = adapters.weather.map(|w| w as Arc<dyn WeatherPort>);
            let service = HomeSummaryService::new(adapters.location, weather);
            let summary = service.summary_from_device().await?;
            println!("📍 {}", summary.address_line);
            println!("🌤️  {}", summary.weather_line());
        },

        Commands::ShareLocation => {
            let service =
                StaffShareService::new(adapters.location, config.staff.to_staff_profile());
            println!("{}", service.share_current_location().await?);
        },

        Commands::Health { .. } => {},
    }

    Ok(())
}

async fn check_health(url: &str) -> anyhow::Result<()> {
    let client = reqwest::Client::new();
    match client.get(endpoint_url(url, "/ready")).send().await {
        Ok(resp) if resp.status().is_success() => {
            println!("✅ Healthy");
            Ok(())
        },
        Ok(resp) => {
            println!("❌ Unhealthy: HTTP {}", resp.status());
            std::process::exit(1);
        },
        Err(e) => {
            println!("❌ Unhealthy: {e}");
            std::process::exit(1);
        },
    }
}
