//! Slotbook HTTP server.
//!
//! Connects to `PostgreSQL`, serves the booking API, and shuts down
//! gracefully on Ctrl+C or SIGTERM.

mod config;

use anyhow::Context as _;
use config::Config;
use metrics_exporter_prometheus::PrometheusBuilder;
use slotbook_core::capacity::CapacityGuard;
use slotbook_core::service::BookingService;
use slotbook_postgres::PostgresBookingStore;
use slotbook_web::{AppState, router};
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::sync::Notify;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "slotbook=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Slotbook HTTP server");

    let config = Config::from_env();
    info!(
        port = config.server.port,
        slot_capacity = config.slot_capacity,
        max_connections = config.postgres.max_connections,
        "Configuration loaded"
    );

    if let Some(port) = config.server.metrics_port {
        PrometheusBuilder::new()
            .with_http_listener(([0, 0, 0, 0], port))
            .install()
            .context("Failed to install Prometheus exporter")?;
        info!(port, "Prometheus metrics available at /metrics");
    }

    info!("Connecting to database...");
    let store = PostgresBookingStore::connect(&config.postgres)
        .await
        .context("Failed to connect to database")?;
    info!("Database connected");

    let service = BookingService::new(Arc::new(store))
        .with_guard(CapacityGuard::new(config.slot_capacity));
    let app = router(AppState::new(service));

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(address = %addr, "Server listening");

    let shutdown = Arc::new(Notify::new());
    let drain = Arc::clone(&shutdown);
    let mut server = tokio::spawn(
        axum::serve(listener, app)
            .with_graceful_shutdown(async move { drain.notified().await })
            .into_future(),
    );

    tokio::select! {
        result = &mut server => {
            result.context("Server task panicked")?.context("Server error")?;
            info!("Server stopped");
            return Ok(());
        }
        () = shutdown_signal() => {}
    }

    shutdown.notify_one();
    let timeout = Duration::from_secs(config.server.shutdown_timeout);
    match tokio::time::timeout(timeout, server).await {
        Ok(result) => {
            result.context("Server task panicked")?.context("Server error")?;
            info!("Server stopped");
        }
        Err(_) => {
            warn!(timeout_secs = timeout.as_secs(), "Shutdown timeout elapsed, dropping open connections");
        }
    }

    Ok(())
}

/// Graceful shutdown signal handler.
///
/// Waits for:
/// - Ctrl+C (SIGINT)
/// - SIGTERM (in production environments)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C signal, shutting down gracefully...");
        },
        () = terminate => {
            info!("Received SIGTERM signal, shutting down gracefully...");
        },
    }
}
