use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use on_air::events::queue::ActionBus;
use on_air::models::schedule::{Schedule, State, TimeBlock};
use on_air::schedule::store::Manager;
use on_air::tasks::executor_loop::{detect_transition, run_transition_loop};
use tokio::sync::watch;

#[tokio::test]
async fn one_block_day_produces_busy_then_free() {
    let manager = Manager::new();
    let start = Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap();
    manager
        .update(Schedule {
            intervals: vec![TimeBlock { start, end }],
        })
        .await;

    let mut state = State::Unknown;
    let mut emitted = Vec::new();
    for t in [
        start,                       // 10:00 exactly, boundary excluded
        start + Duration::hours(1),  // 11:00
        end,                         // 12:00 exactly, boundary excluded
        end + Duration::hours(1),    // 13:00
    ] {
        let in_schedule = manager.in_schedule(t).await;
        if let Some(action) = detect_transition(state, in_schedule, t) {
            emitted.push(action);
            state = action.state;
        }
    }

    // 10:00 -> Free (first sample), 11:00 -> Busy, 12:00 -> Free. 13:00 is
    // still Free and emits nothing.
    let states: Vec<State> = emitted.iter().map(|a| a.state).collect();
    assert_eq!(states, vec![State::Free, State::Busy, State::Free]);
    assert_eq!(emitted[1].time, start + Duration::hours(1));
}

#[tokio::test]
async fn steady_state_emits_nothing_regardless_of_sample_count() {
    let manager = Manager::new();
    let now = Utc::now();
    manager
        .update(Schedule {
            intervals: vec![TimeBlock {
                start: now - Duration::hours(1),
                end: now + Duration::hours(1),
            }],
        })
        .await;

    let mut state = State::Unknown;
    let mut count = 0;
    for i in 0..50 {
        let t = now + Duration::seconds(i);
        if let Some(action) = detect_transition(state, manager.in_schedule(t).await, t) {
            count += 1;
            state = action.state;
        }
    }

    assert_eq!(count, 1, "only the first Busy sample emits");
    assert_eq!(state, State::Busy);
}

#[tokio::test(start_paused = true)]
async fn loop_emits_on_flip_and_stops_on_shutdown() {
    let manager = Arc::new(Manager::new());
    let (bus, mut rx) = ActionBus::new(10);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let task = tokio::spawn(run_transition_loop(manager.clone(), bus, shutdown_rx));

    let first = rx.recv().await.expect("first sample emits");
    assert_eq!(first.state, State::Free);

    // Cover the present moment; the next 1s sample must flip to Busy.
    let now = Utc::now();
    manager
        .update(Schedule {
            intervals: vec![TimeBlock {
                start: now - Duration::hours(1),
                end: now + Duration::hours(1),
            }],
        })
        .await;

    let second = rx.recv().await.expect("flip emits");
    assert_eq!(second.state, State::Busy);

    shutdown_tx.send(true).unwrap();
    task.await.unwrap();

    assert!(rx.recv().await.is_none(), "bus closed once the loop exits");
}
