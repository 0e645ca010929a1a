//! LogRelay Server - Pub/Sub push receiver.
//!
//! This binary provides a thin web server that:
//! - Receives push-delivered envelopes from a Pub/Sub subscription
//! - Decodes the embedded JSON payload
//! - Forwards one record per delivery to the structured logging backend

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use logrelay::web::{router, AppState};
use logrelay::{Config, HttpLogSink, LogSink};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured JSON logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!("relay_server_starting");

    // Load configuration
    let config = Config::from_env();
    info!(
        port = config.port,
        project_id_set = !config.project_id.is_empty(),
        log_endpoint = %config.log_endpoint,
        log_api_token_configured = config.log_api_token.is_some(),
        "config_loaded"
    );

    if config.project_id.is_empty() {
        warn!("project_id_not_set");
    }

    // Create the logging backend client, shared read-only across requests
    let sink = HttpLogSink::new(&config).context("Failed to create logging client")?;
    info!("logsink_created");

    // Create application state
    let state = AppState::new(config.clone(), Arc::new(sink.clone()));

    // Build the router
    let app = router(state);

    // Bind to address
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, "relay_server_listening");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // Drain any entries still buffered in the sink
    if let Err(e) = sink.flush_all().await {
        warn!(error = %e, "logsink_shutdown_flush_failed");
    }

    info!("relay_server_shutdown_complete");

    Ok(())
}

/// Create a future that completes when a shutdown signal is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }

    info!("relay_server_shutting_down");
}
