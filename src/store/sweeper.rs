use crate::ingest::UpdateIngest;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::warn;

/// Periodically evict positions that have not been refreshed within `ttl`.
///
/// Eviction goes through the ingest path so subscribers see evictions and
/// updates in the same order the store applied them.
pub async fn run_eviction_sweeper(
    ingest: Arc<UpdateIngest>,
    ttl: Duration,
    sweep_interval: Duration,
) {
    let ttl = match chrono::Duration::from_std(ttl) {
        Ok(ttl) => ttl,
        Err(e) => {
            warn!(error = %e, "Invalid eviction TTL, sweeper not started");
            return;
        }
    };

    let mut ticker = interval(sweep_interval);

    // Skip missed ticks to prevent backlog under load
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        ingest.evict_older_than(Utc::now() - ttl);
    }
}
