use std::time::Duration;

use abi::SweeperConfig;
use booking::{BookingManager, Bookings};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, info};

/// spawn the periodic expiry sweep: each tick runs to completion before the
/// next is scheduled, and a failed run never ends the loop
pub fn start_sweeper(manager: BookingManager, config: SweeperConfig) -> JoinHandle<()> {
    let period = Duration::from_secs(config.interval_secs.max(1));
    let grace = chrono::Duration::seconds(config.grace_secs);
    tokio::spawn(async move {
        let mut tick = time::interval(period);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // an interval's first tick fires immediately; swallow it so the
        // first sweep happens one full period after startup
        tick.tick().await;
        loop {
            tick.tick().await;
            match manager.sweep_expired(grace).await {
                Ok(0) => debug!("expiry sweep: nothing to cancel"),
                Ok(cancelled) => info!(cancelled, "expiry sweep cancelled unpaid bookings"),
                Err(e) => error!(error = %e, "expiry sweep failed"),
            }
        }
    })
}
