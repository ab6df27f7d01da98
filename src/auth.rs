use std::fs;
use std::io::{self, BufRead, Write};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

pub const FREEBUSY_SCOPE: &str = "https://www.googleapis.com/auth/calendar.freebusy";

const OOB_REDIRECT_URI: &str = "urn:ietf:wg:oauth:2.0:oob";

/// Tokens close to expiry are refreshed early so a request issued right at
/// the boundary does not go out with a dead token.
const EXPIRY_SKEW_SECONDS: i64 = 30;

#[derive(Debug, Deserialize)]
struct CredentialsFile {
    installed: OAuthCredentials,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OAuthCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub auth_uri: String,
    pub token_uri: String,
}

/// Token material persisted at the configured token path, reused across
/// runs until it can no longer be refreshed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredToken {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expiry: Option<DateTime<Utc>>,
}

impl StoredToken {
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        match self.expiry {
            Some(expiry) => now + Duration::seconds(EXPIRY_SKEW_SECONDS) < expiry,
            None => true,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}

pub fn load_token(path: &str) -> Result<StoredToken, String> {
    let content = fs::read_to_string(path).map_err(|e| e.to_string())?;
    serde_json::from_str(&content).map_err(|e| e.to_string())
}

pub fn save_token(path: &str, token: &StoredToken) -> Result<(), String> {
    let content = serde_json::to_string(token).map_err(|e| e.to_string())?;
    fs::write(path, content).map_err(|e| e.to_string())
}

/// Handles the installed-app OAuth flow: loads a persisted token when one
/// exists, refreshes it when expired, and falls back to a one-time console
/// consent exchange otherwise.
pub struct Authenticator {
    http: reqwest::Client,
    creds_source: CredentialsSource,
    token_path: String,
    cached: Mutex<Option<StoredToken>>,
}

enum CredentialsSource {
    Path(String),
    Loaded(OAuthCredentials),
}

impl Authenticator {
    /// Credentials are read per token request, not at startup: a missing or
    /// broken credentials file degrades that load cycle instead of keeping
    /// the process from starting.
    pub fn from_paths(creds_path: String, token_path: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            creds_source: CredentialsSource::Path(creds_path),
            token_path,
            cached: Mutex::new(None),
        }
    }

    pub fn new(creds: OAuthCredentials, token_path: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            creds_source: CredentialsSource::Loaded(creds),
            token_path,
            cached: Mutex::new(None),
        }
    }

    fn credentials(&self) -> Result<OAuthCredentials, String> {
        match &self.creds_source {
            CredentialsSource::Loaded(creds) => Ok(creds.clone()),
            CredentialsSource::Path(path) => {
                let content = fs::read_to_string(path)
                    .map_err(|e| format!("read credentials file {}: {}", path, e))?;
                let parsed: CredentialsFile = serde_json::from_str(&content)
                    .map_err(|e| format!("parse credentials file {}: {}", path, e))?;
                Ok(parsed.installed)
            }
        }
    }

    pub async fn access_token(&self) -> Result<String, String> {
        let mut cached = self.cached.lock().await;
        if cached.is_none() {
            if let Ok(token) = load_token(&self.token_path) {
                *cached = Some(token);
            }
        }

        let now = Utc::now();
        if let Some(token) = cached.as_ref() {
            if token.is_fresh(now) {
                return Ok(token.access_token.clone());
            }
            if let Some(refresh_token) = token.refresh_token.clone() {
                let creds = self.credentials()?;
                let refreshed = self.refresh(&creds, &refresh_token).await?;
                save_token(&self.token_path, &refreshed)?;
                let access = refreshed.access_token.clone();
                *cached = Some(refreshed);
                return Ok(access);
            }
        }

        let creds = self.credentials()?;
        let token = self.exchange_from_console(&creds).await?;
        save_token(&self.token_path, &token)?;
        let access = token.access_token.clone();
        *cached = Some(token);
        Ok(access)
    }

    async fn refresh(
        &self,
        creds: &OAuthCredentials,
        refresh_token: &str,
    ) -> Result<StoredToken, String> {
        let response = self
            .http
            .post(&creds.token_uri)
            .form(&[
                ("client_id", creds.client_id.as_str()),
                ("client_secret", creds.client_secret.as_str()),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(|e| e.to_string())?;
        let mut token = parse_token_response(response).await?;
        // Google omits the refresh token on refresh grants; keep the old one.
        if token.refresh_token.is_none() {
            token.refresh_token = Some(refresh_token.to_string());
        }
        Ok(token)
    }

    async fn exchange_from_console(
        &self,
        creds: &OAuthCredentials,
    ) -> Result<StoredToken, String> {
        let url = reqwest::Url::parse_with_params(
            &creds.auth_uri,
            &[
                ("client_id", creds.client_id.as_str()),
                ("redirect_uri", OOB_REDIRECT_URI),
                ("response_type", "code"),
                ("scope", FREEBUSY_SCOPE),
                ("access_type", "offline"),
            ],
        )
        .map_err(|e| format!("build auth url: {}", e))?;

        println!(
            "Go to the following link in your browser then type the authorization code:\n{}",
            url
        );
        print!("code: ");
        io::stdout().flush().map_err(|e| e.to_string())?;
        let mut code = String::new();
        io::stdin()
            .lock()
            .read_line(&mut code)
            .map_err(|e| e.to_string())?;
        let code = code.trim();
        if code.is_empty() {
            return Err("no authorization code provided".to_string());
        }

        let response = self
            .http
            .post(&creds.token_uri)
            .form(&[
                ("client_id", creds.client_id.as_str()),
                ("client_secret", creds.client_secret.as_str()),
                ("code", code),
                ("redirect_uri", OOB_REDIRECT_URI),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| e.to_string())?;
        parse_token_response(response).await
    }
}

async fn parse_token_response(response: reqwest::Response) -> Result<StoredToken, String> {
    let status = response.status();
    let text = response.text().await.map_err(|e| e.to_string())?;
    if !status.is_success() {
        return Err(format!("token endpoint returned {}: {}", status, text));
    }
    let parsed: TokenResponse =
        serde_json::from_str(&text).map_err(|e| format!("parse token response: {}", e))?;
    Ok(StoredToken {
        access_token: parsed.access_token,
        refresh_token: parsed.refresh_token,
        expiry: parsed
            .expires_in
            .map(|secs| Utc::now() + Duration::seconds(secs)),
    })
}
