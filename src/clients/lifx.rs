use async_trait::async_trait;
use serde_json::{Value, json};

const BASE_URL: &str = "https://api.lifx.com/v1/";

// Colors used when the config leaves one blank.
const DEFAULT_BUSY_COLOR: &str = "red saturation:0.5";
const DEFAULT_FREE_COLOR: &str = "kelvin:2671";

/// The light being driven, resolved from static configuration.
#[derive(Debug, Clone, Default)]
pub struct Light {
    pub id: String,
    pub label: String,
}

#[async_trait]
pub trait LightClient: Send + Sync {
    async fn set_busy(&self, light: &Light, color: &str) -> Result<(), String>;
    async fn set_free(&self, light: &Light, color: &str) -> Result<(), String>;
}

pub struct LifxClient {
    http: reqwest::Client,
    token: String,
}

impl LifxClient {
    pub fn new(token: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            token,
        }
    }

    async fn set_state(&self, selector: &str, state: Value) -> Result<(), String> {
        let url = format!("{}lights/{}/state", BASE_URL, selector);
        let response = self
            .http
            .put(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .json(&state)
            .send()
            .await
            .map_err(|e| format!("lifx request: {}", e))?;

        let status = response.status().as_u16();
        // The state endpoint answers 207 for per-light results.
        if status != 200 && status != 207 {
            let body = response.text().await.unwrap_or_default();
            return Err(format!("lifx API error: {}", body));
        }
        Ok(())
    }
}

pub fn busy_state_payload(color: &str) -> Value {
    let color = if color.is_empty() {
        DEFAULT_BUSY_COLOR
    } else {
        color
    };
    json!({ "power": "on", "color": color })
}

pub fn free_state_payload(color: &str) -> Value {
    let color = if color.is_empty() {
        DEFAULT_FREE_COLOR
    } else {
        color
    };
    json!({ "power": "on", "color": color, "brightness": 0.5 })
}

#[async_trait]
impl LightClient for LifxClient {
    async fn set_busy(&self, light: &Light, color: &str) -> Result<(), String> {
        self.set_state(&format!("id:{}", light.id), busy_state_payload(color))
            .await
    }

    async fn set_free(&self, light: &Light, color: &str) -> Result<(), String> {
        self.set_state(&format!("id:{}", light.id), free_state_payload(color))
            .await
    }
}
