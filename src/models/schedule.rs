use chrono::{DateTime, Utc};

/// One busy interval. `start` is always before `end`; blocks are never
/// mutated after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeBlock {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// The busy intervals currently known for the configured calendar. Empty is
/// valid and means "no known busy time" — a failed load looks the same.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule {
    pub intervals: Vec<TimeBlock>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Busy,
    Free,
    Unknown,
}

/// A detected state change, consumed once by the action worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Action {
    pub state: State,
    pub time: DateTime<Utc>,
}
