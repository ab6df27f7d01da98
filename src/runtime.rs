use std::sync::Arc;

use tokio::sync::watch;

use crate::auth::Authenticator;
use crate::clients::calendar::GoogleCalendarClient;
use crate::clients::lifx::{Light, LifxClient, LightClient};
use crate::config::Config;
use crate::events::queue::{ActionBus, DEFAULT_QUEUE_CAPACITY};
use crate::events::worker::run_action_worker;
use crate::schedule::loader::ScheduleLoader;
use crate::schedule::store::Manager;
use crate::tasks::executor_loop::run_transition_loop;
use crate::tasks::reload_loop::run_reload_loop;

/// Wires the store, loader, detector and worker together and runs until a
/// termination signal arrives.
pub async fn run(config: Config) {
    let auth = Arc::new(Authenticator::from_paths(
        config.credentials.clone(),
        config.token.clone(),
    ));
    let calendar_client = Arc::new(GoogleCalendarClient::new(auth));
    let loader = ScheduleLoader::new(calendar_client, config.calendar.clone(), config.days);

    let manager = Arc::new(Manager::new());
    manager.update(loader.load().await).await;

    let light = Light {
        id: config.lifx_light_id.clone(),
        label: config.lifx_light_label.clone(),
    };
    let lifx = Arc::new(LifxClient::new(config.lifx_token.clone()));

    let (bus, rx) = ActionBus::new(DEFAULT_QUEUE_CAPACITY);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn(run_reload_loop(
        manager.clone(),
        loader,
        config.reload_interval_seconds,
        shutdown_rx.clone(),
    ));
    tokio::spawn(run_action_worker(
        rx,
        lifx.clone(),
        light.clone(),
        config.lifx_busy_color.clone(),
        config.lifx_free_color.clone(),
    ));
    tokio::spawn(run_transition_loop(manager, bus, shutdown_rx));

    wait_for_signal().await;
    println!("Received signal, setting light to free state and exiting...");
    let _ = shutdown_tx.send(true);
    if let Err(err) = lifx.set_free(&light, &config.lifx_free_color).await {
        eprintln!("Failed to set light to free state: {}", err);
    }
}

async fn wait_for_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        let mut term = match signal(SignalKind::terminate()) {
            Ok(term) => term,
            Err(err) => {
                eprintln!("Failed to install SIGTERM handler: {}", err);
                let _ = tokio::signal::ctrl_c().await;
                return;
            }
        };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = term.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
