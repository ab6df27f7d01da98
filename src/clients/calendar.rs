use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::Authenticator;

const FREEBUSY_URL: &str = "https://www.googleapis.com/calendar/v3/freeBusy";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FreeBusyRequest {
    time_min: String,
    time_max: String,
    items: Vec<FreeBusyRequestItem>,
}

#[derive(Debug, Serialize)]
struct FreeBusyRequestItem {
    id: String,
}

/// Busy block boundaries as RFC3339 strings, exactly as the API returns
/// them. The loader parses them and decides what to drop.
#[derive(Debug, Clone, Deserialize)]
pub struct BusyBlock {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CalendarBusy {
    #[serde(default)]
    pub busy: Vec<BusyBlock>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FreeBusyResponse {
    #[serde(default)]
    pub calendars: HashMap<String, CalendarBusy>,
}

/// Failure classification the loader's retry policy depends on: only
/// server-side API errors are worth retrying.
#[derive(Debug, Clone)]
pub enum CalendarError {
    Auth(String),
    Api { status: u16, body: String },
    Transport(String),
}

impl CalendarError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, CalendarError::Api { status, .. } if (500..=599).contains(status))
    }
}

impl fmt::Display for CalendarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalendarError::Auth(msg) => write!(f, "auth: {}", msg),
            CalendarError::Api { status, body } => write!(f, "api error {}: {}", status, body),
            CalendarError::Transport(msg) => write!(f, "transport: {}", msg),
        }
    }
}

impl std::error::Error for CalendarError {}

#[async_trait]
pub trait FreeBusyClient: Send + Sync {
    async fn query(
        &self,
        calendar_id: &str,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> Result<FreeBusyResponse, CalendarError>;
}

pub struct GoogleCalendarClient {
    http: reqwest::Client,
    auth: Arc<Authenticator>,
}

impl GoogleCalendarClient {
    pub fn new(auth: Arc<Authenticator>) -> Self {
        Self {
            http: reqwest::Client::new(),
            auth,
        }
    }
}

#[async_trait]
impl FreeBusyClient for GoogleCalendarClient {
    async fn query(
        &self,
        calendar_id: &str,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> Result<FreeBusyResponse, CalendarError> {
        let token = self
            .auth
            .access_token()
            .await
            .map_err(CalendarError::Auth)?;

        let request = FreeBusyRequest {
            time_min: time_min.to_rfc3339(),
            time_max: time_max.to_rfc3339(),
            items: vec![FreeBusyRequestItem {
                id: calendar_id.to_string(),
            }],
        };

        let response = self
            .http
            .post(FREEBUSY_URL)
            .header("Authorization", format!("Bearer {}", token))
            .json(&request)
            .send()
            .await
            .map_err(|e| CalendarError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| CalendarError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(CalendarError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text).map_err(|e| {
            CalendarError::Transport(format!("failed to parse freebusy response: {}", e))
        })
    }
}
