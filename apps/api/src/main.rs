//! # Tally API server
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Tally API Server                                │
//! │                                                                         │
//! │  HTTP client ───► axum (9999) ───► Services ───► SQLite (WAL)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tally_api::{router, ApiConfig, AppState};
use tally_db::Database;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_target(true)
        .init();

    info!("Starting Tally API server...");

    let config = ApiConfig::load()?;
    info!(
        host = %config.http_host,
        port = config.http_port,
        database = %config.database_path.display(),
        token_ttl_secs = config.token_ttl_secs,
        "Configuration loaded"
    );

    if let Some(parent) = config.database_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }

    let db = Database::new(config.db_config()).await?;
    info!("Database ready");

    let listener = TcpListener::bind((config.http_host.as_str(), config.http_port))
        .await
        .with_context(|| format!("binding {}:{}", config.http_host, config.http_port))?;
    info!(addr = %listener.local_addr()?, "Listening");

    let state = AppState::new(db.clone(), config).shared();

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
