use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::interval;

use crate::schedule::loader::ScheduleLoader;
use crate::schedule::store::Manager;

const DEFAULT_RELOAD_INTERVAL: Duration = Duration::from_secs(60);

pub fn reload_interval(configured_seconds: i64) -> Duration {
    if configured_seconds <= 0 {
        DEFAULT_RELOAD_INTERVAL
    } else {
        Duration::from_secs(configured_seconds as u64)
    }
}

/// Refreshes the schedule on a fixed period until shutdown. Every cycle
/// overwrites the store with whatever the loader returned, including an
/// empty schedule from a failed load — stale busy state is worse than a
/// briefly wrong light.
pub async fn run_reload_loop(
    manager: Arc<Manager>,
    loader: ScheduleLoader,
    reload_interval_seconds: i64,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = interval(reload_interval(reload_interval_seconds));
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                manager.update(loader.load().await).await;
                println!("Schedule reloaded");
            }
            _ = shutdown.changed() => return,
        }
    }
}
