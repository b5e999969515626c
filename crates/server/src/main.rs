mod api;
mod bootstrap;
mod health;

use std::time::Duration;

use anyhow::Result;
use atelier_core::config::{AppConfig, LoadOptions};

fn init_logging(config: &AppConfig) {
    use atelier_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

pub async fn run() -> Result<()> {
    // Load config and initialize logging before any other operations
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    // Now bootstrap using the same config we already loaded
    let app = bootstrap::bootstrap_with_config(config).await?;

    let address = format!("{}:{}", app.config.server.bind_address, app.config.server.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;

    let router = api::router(app.api_state.clone()).merge(health::router(app.db_pool.clone()));
    let drain_window = Duration::from_secs(app.config.server.graceful_shutdown_secs);

    tracing::info!(
        event_name = "system.server.started",
        correlation_id = "bootstrap",
        bind_address = %address,
        "atelier-server listening"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(wait_for_shutdown(drain_window))
        .await?;

    tracing::info!(
        event_name = "system.server.stopped",
        correlation_id = "shutdown",
        "atelier-server stopped"
    );

    Ok(())
}

async fn wait_for_shutdown(drain_window: Duration) {
    if tokio::signal::ctrl_c().await.is_err() {
        tracing::error!(
            event_name = "system.server.signal_error",
            correlation_id = "shutdown",
            "failed to install ctrl-c handler"
        );
        return;
    }

    tracing::info!(
        event_name = "system.server.stopping",
        correlation_id = "shutdown",
        drain_secs = drain_window.as_secs(),
        "shutdown signal received, draining in-flight requests"
    );
}
