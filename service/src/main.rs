use abi::Config;
use anyhow::Result;
use booking_service::{start_sweeper, BookingService};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let filename =
        std::env::var("BOOKING_CONFIG").unwrap_or_else(|_| "fixtures/config.yml".to_string());
    let config = Config::load(&filename)?;
    let service = BookingService::from_config(&config).await?;

    info!(
        interval_secs = config.sweeper.interval_secs,
        grace_secs = config.sweeper.grace_secs,
        "starting booking expiry sweeper"
    );
    let sweeper = start_sweeper(service.manager().clone(), config.sweeper.clone());

    tokio::signal::ctrl_c().await?;
    info!("shutting down");
    sweeper.abort();
    Ok(())
}
