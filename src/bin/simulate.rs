use anyhow::Result;
use courier_tracker::simulator::{run_simulator, SimulatorConfig};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "courier_tracker=info".into()),
        )
        .init();

    run_simulator(SimulatorConfig::from_env()).await
}
