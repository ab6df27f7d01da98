use clap::Parser;

use crate::config::Config;

/// Drives a LIFX light from Google Calendar free/busy state.
#[derive(Debug, Parser)]
pub struct Flags {
    /// Path to the config file
    #[arg(long, default_value = "config.json")]
    pub config: String,
    /// Path to OAuth client JSON
    #[arg(long)]
    pub credentials: Option<String>,
    /// Path to store OAuth tokens
    #[arg(long)]
    pub token: Option<String>,
    /// Calendar ID or 'primary'
    #[arg(long)]
    pub calendar: Option<String>,
    /// How many days ahead to check
    #[arg(long)]
    pub days: Option<i64>,
    /// LIFX API token
    #[arg(long)]
    pub lifx_token: Option<String>,
    /// LIFX light ID
    #[arg(long)]
    pub lifx_light_id: Option<String>,
    /// LIFX light label
    #[arg(long)]
    pub lifx_light_label: Option<String>,
    /// Color while busy
    #[arg(long)]
    pub lifx_busy_color: Option<String>,
    /// Color while free
    #[arg(long)]
    pub lifx_free_color: Option<String>,
    /// Reload interval in seconds
    #[arg(long)]
    pub reload_interval_seconds: Option<i64>,
}

impl Flags {
    /// Flags beat file values; anything not given on the command line keeps
    /// whatever the config file said.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(v) = &self.credentials {
            config.credentials = v.clone();
        }
        if let Some(v) = &self.token {
            config.token = v.clone();
        }
        if let Some(v) = &self.calendar {
            config.calendar = v.clone();
        }
        if let Some(v) = self.days {
            config.days = v;
        }
        if let Some(v) = &self.lifx_token {
            config.lifx_token = v.clone();
        }
        if let Some(v) = &self.lifx_light_id {
            config.lifx_light_id = v.clone();
        }
        if let Some(v) = &self.lifx_light_label {
            config.lifx_light_label = v.clone();
        }
        if let Some(v) = &self.lifx_busy_color {
            config.lifx_busy_color = v.clone();
        }
        if let Some(v) = &self.lifx_free_color {
            config.lifx_free_color = v.clone();
        }
        if let Some(v) = self.reload_interval_seconds {
            config.reload_interval_seconds = v;
        }
    }
}
