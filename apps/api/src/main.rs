//! # Stockroom API Server
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Stockroom API Server                           │
//! │                                                                         │
//! │  Client ───► HTTP (8080) ───► Routes ───► Services ───► SQLite          │
//! │                                              │                          │
//! │                        StockMonitor ─────────┤                          │
//! │                        (hourly)              ▼                          │
//! │                                     NotificationService ───► mail relay │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use anyhow::Context;
use stockroom_api::services::notification::NotificationService;
use stockroom_api::services::stock_monitor::StockMonitor;
use stockroom_api::{build_router, init_tracing, AppConfig, AppState};
use stockroom_db::{Database, DbConfig};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    info!("Starting Stockroom API server...");

    // Load configuration
    let config = AppConfig::load()?;
    info!(
        addr = %config.bind_addr(),
        db = %config.database.path,
        monitor = config.monitor.enabled,
        "Configuration loaded"
    );

    // Open database (migrations run on connect)
    let db = Database::new(
        DbConfig::new(&config.database.path).max_connections(config.database.max_connections),
    )
    .await
    .context("Failed to open database")?;
    info!("Database ready");

    let notifier = NotificationService::from_mail_config(config.mail_settings())
        .context("Failed to build mail transport")?;

    // Background low-stock sweep
    let monitor = if config.monitor.enabled {
        let (monitor, handle) =
            StockMonitor::new(db.clone(), notifier.clone(), config.monitor.interval());
        Some((tokio::spawn(monitor.run()), handle))
    } else {
        info!("Stock monitor disabled");
        None
    };

    let app = build_router(AppState::new(db.clone(), notifier));

    let listener = TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr()))?;
    info!(addr = %config.bind_addr(), "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some((task, handle)) = monitor {
        handle.shutdown().await;
        task.abort();
    }
    db.close().await;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
