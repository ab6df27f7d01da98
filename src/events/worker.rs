use std::sync::Arc;

use tokio::sync::mpsc;

use crate::clients::lifx::{Light, LightClient};
use crate::models::schedule::{Action, State};

/// Drains the action queue and issues device calls one at a time. A failed
/// call is logged and the action dropped; the next action still runs. The
/// loop ends when every sender handle is gone.
pub async fn run_action_worker(
    mut rx: mpsc::Receiver<Action>,
    client: Arc<dyn LightClient>,
    light: Light,
    busy_color: String,
    free_color: String,
) {
    while let Some(action) = rx.recv().await {
        match action.state {
            State::Busy => {
                if let Err(err) = client.set_busy(&light, &busy_color).await {
                    eprintln!("Failed to set busy state: {}", err);
                    continue;
                }
                println!("Set busy at {}", action.time.to_rfc3339());
            }
            State::Free => {
                if let Err(err) = client.set_free(&light, &free_color).await {
                    eprintln!("Failed to set free state: {}", err);
                    continue;
                }
                println!("Set free at {}", action.time.to_rfc3339());
            }
            State::Unknown => {}
        }
    }
}
