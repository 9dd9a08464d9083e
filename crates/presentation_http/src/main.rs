//! Smart Transit HTTP Server
//!
//! Main entry point for the HTTP API server.

use std::{sync::Arc, time::Duration};

use application::{LocationPort, TransitDirectoryPort, WeatherPort};
use axum::http::{HeaderValue, Method};
use infrastructure::{Adapters, AppConfig, init_telemetry};
use presentation_http::{routes, set_expose_internal_errors, state::AppState};
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (config, load_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    init_telemetry(&config.telemetry)?;
    if let Some(e) = load_error {
        warn!("Failed to load config, using defaults: {}", e);
    }
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;

    info!("🚌 Smart Transit v{} starting...", env!("CARGO_PKG_VERSION"));
    info!(
        host = %config.server.host,
        port = %config.server.port,
        project = %config.directory.project_id,
        weather = config.weather.is_some(),
        "Configuration loaded"
    );

    set_expose_internal_errors(cfg!(debug_assertions));

    let adapters = Adapters::from_config(&config)
        .map_err(|e| anyhow::anyhow!("Failed to initialize adapters: {e}"))?;
    let tracking = config
        .tracking
        .to_tracking_config()
        .map_err(|e| anyhow::anyhow!("Invalid tracking configuration: {e}"))?;

    let location: Arc<dyn LocationPort> = adapters.location;
    let directory: Arc<dyn TransitDirectoryPort> = adapters.directory;
    let weather = adapters.weather.map(|w| w as Arc<dyn WeatherPort>);

    let state = AppState::new(
        location,
        directory,
        weather,
        tracking.policy,
        config.staff.to_staff_profile(),
    );

    let cors_layer = config.server.cors_enabled.then(|| {
        if config.server.allowed_origins.is_empty() {
            // Development mode: allow all origins
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<HeaderValue> = config
                .server
                .allowed_origins
                .iter()
                .filter_map(|o| o.parse().ok())
                .collect();
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods([Method::GET])
                .allow_headers(Any)
        }
    });

    #[allow(deprecated)]
    let timeout_layer = TimeoutLayer::new(Duration::from_secs(config.server.request_timeout_secs));

    let mut app = routes::create_router(state)
        .layer(timeout_layer)
        .layer(TraceLayer::new_for_http());
    if let Some(cors_layer) = cors_layer {
        app = app.layer(cors_layer);
    }

    let addr = config.server.bind_address();
    let listener = TcpListener::bind(&addr).await?;

    info!("🚀 Server listening on http://{}", addr);

    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs.unwrap_or(30));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_timeout))
        .await?;

    info!("👋 Server shutdown complete");

    Ok(())
}

/// Wait for SIGINT or SIGTERM
async fn shutdown_signal(timeout: Duration) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("📥 Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("📥 Received SIGTERM, initiating graceful shutdown...");
        }
    }

    info!("⏳ Waiting up to {:?} for connections to close...", timeout);
}
