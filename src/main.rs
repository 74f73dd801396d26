use anyhow::{Context, Result};
use courier_tracker::api::{create_router, AppState};
use courier_tracker::config::{load_config, TrackerConfig};
use courier_tracker::store::run_eviction_sweeper;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "courier_tracker=info".into()),
        )
        .init();

    info!("Courier tracker starting...");

    let config = match std::env::var("TRACKER_CONFIG") {
        Ok(path) => load_config(&path)
            .map_err(|e| anyhow::anyhow!("Failed to load config from {}: {}", path, e))?,
        Err(_) => TrackerConfig::default(),
    };

    let state = AppState::new(config.hub.subscriber_capacity, config.limits);

    if let Some((ttl, sweep_interval)) = config.store.eviction() {
        info!(
            ttl_seconds = ttl.as_secs(),
            sweep_interval_seconds = sweep_interval.as_secs(),
            "Position eviction enabled"
        );
        tokio::spawn(run_eviction_sweeper(
            Arc::clone(&state.ingest),
            ttl,
            sweep_interval,
        ));
    }

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind_addr))?;
    info!(addr = %config.server.bind_addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Courier tracker stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
