use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::time::interval;

use crate::events::queue::ActionBus;
use crate::models::schedule::{Action, State};
use crate::schedule::store::Manager;

const SAMPLE_PERIOD: Duration = Duration::from_secs(1);

/// One sampling step of the Busy/Free state machine. Returns an action only
/// when the sampled state differs from `current`; the first real sample
/// always differs from the initial `Unknown`.
pub fn detect_transition(
    current: State,
    in_schedule: bool,
    now: DateTime<Utc>,
) -> Option<Action> {
    let new_state = if in_schedule { State::Busy } else { State::Free };
    if new_state == current {
        return None;
    }
    Some(Action {
        state: new_state,
        time: now,
    })
}

/// Samples the store once a second and pushes state changes onto the bus.
/// The send blocks while the queue is full; that backpressure is the point
/// of the bounded queue.
pub async fn run_transition_loop(
    manager: Arc<Manager>,
    bus: ActionBus,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = interval(SAMPLE_PERIOD);
    let mut current = State::Unknown;
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let now = Utc::now();
                let in_schedule = manager.in_schedule(now).await;
                if let Some(action) = detect_transition(current, in_schedule, now) {
                    bus.emit(action).await;
                    current = action.state;
                }
            }
            _ = shutdown.changed() => return,
        }
    }
}
