use crate::config::Config;
use crate::error::{google_calendar_error, SyncResult};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::debug;

/// Refresh this long before the token actually expires
const EXPIRY_MARGIN_SECS: i64 = 60;
const DEFAULT_EXPIRES_IN_SECS: i64 = 3600;

/// Source of bearer tokens for the Calendar API
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    async fn access_token(&self) -> SyncResult<String>;
}

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: Option<i64>,
}

/// Exchanges the configured refresh token for access tokens and caches them
pub struct TokenManager {
    client: Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    refresh_token: String,
    cached: Mutex<Option<AccessToken>>,
}

impl TokenManager {
    pub fn new(config: &Config, client: Client) -> Self {
        Self {
            client,
            token_url: config.google_token_url.clone(),
            client_id: config.google_client_id.clone(),
            client_secret: config.google_client_secret.clone(),
            refresh_token: config.google_refresh_token.clone(),
            cached: Mutex::new(None),
        }
    }

    /// Request a fresh access token with the refresh-token grant
    async fn refresh(&self) -> SyncResult<AccessToken> {
        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("refresh_token", self.refresh_token.as_str()),
            ("grant_type", "refresh_token"),
        ];

        let response = self
            .client
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to refresh token: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(google_calendar_error(&format!(
                "Failed to refresh token: HTTP {} - {}",
                status, error_body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to parse token response: {}", e)))?;

        let expires_in = token.expires_in.unwrap_or(DEFAULT_EXPIRES_IN_SECS);
        debug!(expires_in, "Refreshed Google access token");

        Ok(AccessToken {
            value: token.access_token,
            expires_at: Utc::now() + Duration::seconds(expires_in),
        })
    }
}

#[async_trait]
impl AccessTokenProvider for TokenManager {
    async fn access_token(&self) -> SyncResult<String> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref() {
            if token.expires_at - Duration::seconds(EXPIRY_MARGIN_SECS) > Utc::now() {
                return Ok(token.value.clone());
            }
        }

        let token = self.refresh().await?;
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }
}
