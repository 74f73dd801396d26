// Movement simulator: a producer that random-walks couriers and reports
// each step to the ingest endpoint.

use crate::position::PositionReport;
use anyhow::{Context, Result};
use rand::Rng;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{info, warn};

/// Harare city centre
pub const DEFAULT_CENTER: (f64, f64) = (-17.8292, 31.0522);

/// Simulator settings
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Base URL of the tracker, e.g. "http://localhost:3000"
    pub base_url: String,
    pub couriers: usize,
    pub interval: Duration,
    pub center: (f64, f64),
    /// Largest per-step move in degrees on each axis
    pub max_step_degrees: f64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            couriers: 3,
            interval: Duration::from_secs(2),
            center: DEFAULT_CENTER,
            max_step_degrees: 0.001,
        }
    }
}

impl SimulatorConfig {
    /// Build from env vars, falling back to defaults.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("SIMULATOR_BASE_URL") {
            cfg.base_url = v;
        }
        if let Ok(v) = std::env::var("SIMULATOR_COURIERS") {
            if let Ok(n) = v.parse::<usize>() {
                cfg.couriers = n;
            }
        }
        if let Ok(v) = std::env::var("SIMULATOR_INTERVAL_MS") {
            if let Ok(ms) = v.parse::<u64>() {
                cfg.interval = Duration::from_millis(ms.max(1));
            }
        }

        cfg
    }
}

/// A simulated courier
#[derive(Debug, Clone, PartialEq)]
pub struct Courier {
    pub id: String,
    pub lat: f64,
    pub lng: f64,
}

impl Courier {
    pub fn new(id: impl Into<String>, (lat, lng): (f64, f64)) -> Self {
        Self {
            id: id.into(),
            lat,
            lng,
        }
    }

    /// Move by up to `max_step` degrees on each axis, staying on the globe.
    pub fn step<R: Rng>(&mut self, rng: &mut R, max_step: f64) {
        if max_step > 0.0 {
            self.lat += rng.gen_range(-max_step..=max_step);
            self.lng += rng.gen_range(-max_step..=max_step);
        }
        self.lat = self.lat.clamp(-90.0, 90.0);
        self.lng = wrap_longitude(self.lng);
    }

    pub fn report(&self) -> PositionReport {
        PositionReport::new(self.id.clone(), self.lat, self.lng)
    }
}

fn wrap_longitude(lng: f64) -> f64 {
    if (-180.0..=180.0).contains(&lng) {
        lng
    } else {
        (lng + 180.0).rem_euclid(360.0) - 180.0
    }
}

/// Couriers named `courier-1..=n`, all starting at `center`
pub fn spawn_couriers(n: usize, center: (f64, f64)) -> Vec<Courier> {
    (1..=n)
        .map(|i| Courier::new(format!("courier-{}", i), center))
        .collect()
}

/// Report every courier's position each tick until the task is cancelled.
///
/// Failed reports are logged and the walk continues.
pub async fn run_simulator(config: SimulatorConfig) -> Result<()> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .context("Failed to build HTTP client")?;
    let endpoint = format!("{}/api/locations", config.base_url.trim_end_matches('/'));

    let mut couriers = spawn_couriers(config.couriers, config.center);
    let mut ticker = interval(config.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(
        endpoint = %endpoint,
        couriers = couriers.len(),
        "Simulator started"
    );

    loop {
        ticker.tick().await;

        for courier in &mut couriers {
            // ThreadRng is not Send; keep it out of the await below
            courier.step(&mut rand::thread_rng(), config.max_step_degrees);

            match client.post(&endpoint).json(&courier.report()).send().await {
                Ok(resp) if resp.status().is_success() => {}
                Ok(resp) => warn!(id = %courier.id, status = %resp.status(), "Report rejected"),
                Err(e) => warn!(id = %courier.id, error = %e, "Report failed"),
            }
        }
    }
}
