use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::sleep;

use crate::clients::calendar::{FreeBusyClient, FreeBusyResponse};
use crate::models::schedule::{Schedule, TimeBlock};

const MAX_ATTEMPTS: u32 = 3;
const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(8);

/// Fetches a fresh schedule from the calendar. Every failure path degrades
/// to an empty schedule so a broken upstream never takes the light loop
/// down.
pub struct ScheduleLoader {
    client: Arc<dyn FreeBusyClient>,
    calendar_id: String,
    lookahead_days: i64,
}

impl ScheduleLoader {
    pub fn new(client: Arc<dyn FreeBusyClient>, calendar_id: String, lookahead_days: i64) -> Self {
        Self {
            client,
            calendar_id,
            lookahead_days,
        }
    }

    pub async fn load(&self) -> Schedule {
        let now = Utc::now();
        let to = now + chrono::Duration::hours(24 * self.lookahead_days);

        let mut backoff = INITIAL_BACKOFF;
        let mut last_err = None;
        let mut response = None;
        for attempt in 1..=MAX_ATTEMPTS {
            match self.client.query(&self.calendar_id, now, to).await {
                Ok(resp) => {
                    response = Some(resp);
                    break;
                }
                Err(err) => {
                    let retryable = err.is_retryable();
                    if !retryable || attempt == MAX_ATTEMPTS {
                        last_err = Some(err);
                        break;
                    }
                    println!(
                        "freebusy query attempt {} failed: {}. Retrying in {:?}...",
                        attempt, err, backoff
                    );
                    last_err = Some(err);
                    sleep(backoff).await;
                    backoff = (backoff * 2).min(MAX_BACKOFF);
                }
            }
        }

        let Some(response) = response else {
            if let Some(err) = last_err {
                eprintln!("freebusy query: {}", err);
            }
            return Schedule::default();
        };

        first_busy_block(&response)
    }
}

// Keeps only the first parseable busy block of the first calendar entry
// that has one. Downstream tests pin the single-interval result, so do not
// switch this to aggregating every block without revisiting them.
fn first_busy_block(response: &FreeBusyResponse) -> Schedule {
    for (id, calendar) in &response.calendars {
        if calendar.busy.is_empty() {
            println!("  {}: no busy blocks", id);
            continue;
        }
        for block in &calendar.busy {
            let start = match DateTime::parse_from_rfc3339(&block.start) {
                Ok(t) => t.with_timezone(&Utc),
                Err(err) => {
                    eprintln!("parse start time: {}", err);
                    continue;
                }
            };
            let end = match DateTime::parse_from_rfc3339(&block.end) {
                Ok(t) => t.with_timezone(&Utc),
                Err(err) => {
                    eprintln!("parse end time: {}", err);
                    continue;
                }
            };
            return Schedule {
                intervals: vec![TimeBlock { start, end }],
            };
        }
    }
    Schedule::default()
}
