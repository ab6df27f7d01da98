use tokio::sync::mpsc;

use crate::models::schedule::Action;

pub const DEFAULT_QUEUE_CAPACITY: usize = 10;

/// Bounded handoff between the transition detector and the action worker.
/// `emit` blocks when the queue is full; actions are never dropped.
#[derive(Clone)]
pub struct ActionBus {
    tx: mpsc::Sender<Action>,
}

impl ActionBus {
    pub fn new(buffer: usize) -> (Self, mpsc::Receiver<Action>) {
        let (tx, rx) = mpsc::channel(buffer);
        (Self { tx }, rx)
    }

    pub async fn emit(&self, action: Action) {
        let _ = self.tx.send(action).await;
    }
}
