use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::models::schedule::Schedule;

/// Holds the current schedule behind a readers-writer lock. Shared between
/// the reload loop (writer) and the transition loop (reader) as an
/// `Arc<Manager>`.
pub struct Manager {
    current: RwLock<Schedule>,
}

impl Manager {
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Schedule::default()),
        }
    }

    /// Replaces the held schedule wholesale. Readers see either the old or
    /// the new schedule, never a mix.
    pub async fn update(&self, schedule: Schedule) {
        let mut current = self.current.write().await;
        *current = schedule;
    }

    /// True iff `t` falls strictly inside some block. Boundary instants are
    /// not inside.
    pub async fn in_schedule(&self, t: DateTime<Utc>) -> bool {
        let current = self.current.read().await;
        current
            .intervals
            .iter()
            .any(|block| t > block.start && t < block.end)
    }
}

impl Default for Manager {
    fn default() -> Self {
        Self::new()
    }
}
