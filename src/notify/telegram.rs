//! Telegram Bot API notifier

use super::message::{NotificationMessage, DEFAULT_EXPLORER_URL};
use super::{Notifier, SendOutcome};
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig};
use crate::types::TransferRecord;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use tracing::{info, warn};

/// Wait used when a 429 body carries no usable `retry_after`
pub const DEFAULT_RETRY_AFTER_SECS: u64 = 30;

/// Bot API settings
#[derive(Clone)]
pub struct TelegramConfig {
    /// Bot token from BotFather
    pub bot_token: String,
    /// Target chat or channel id
    pub chat_id: String,
    /// API base, overridable for tests
    pub api_base: String,
    /// Explorer used for navigation buttons
    pub explorer_base: String,
    /// Unit label appended to the amount
    pub unit: String,
    /// Fallback wait for a 429 without `retry_after`
    pub default_retry_after_secs: u64,
    /// Skip TLS certificate verification
    pub insecure_skip_tls_verify: bool,
    /// Request timeout
    pub timeout: Duration,
}

impl TelegramConfig {
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
            api_base: "https://api.telegram.org".to_string(),
            explorer_base: DEFAULT_EXPLORER_URL.to_string(),
            unit: "MON".to_string(),
            default_retry_after_secs: DEFAULT_RETRY_AFTER_SECS,
            insecure_skip_tls_verify: false,
            timeout: Duration::from_secs(30),
        }
    }

    #[must_use]
    pub fn api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    #[must_use]
    pub fn explorer_base(mut self, explorer_base: impl Into<String>) -> Self {
        self.explorer_base = explorer_base.into();
        self
    }

    #[must_use]
    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    #[must_use]
    pub fn insecure_skip_tls_verify(mut self, skip: bool) -> Self {
        self.insecure_skip_tls_verify = skip;
        self
    }
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("chat_id", &self.chat_id)
            .field("api_base", &self.api_base)
            .field("explorer_base", &self.explorer_base)
            .field("insecure_skip_tls_verify", &self.insecure_skip_tls_verify)
            .finish_non_exhaustive()
    }
}

/// Posts transfer alerts through `sendMessage`
#[derive(Debug, Clone)]
pub struct TelegramNotifier {
    client: HttpClient,
    config: TelegramConfig,
}

impl TelegramNotifier {
    pub fn new(config: TelegramConfig) -> Result<Self> {
        url::Url::parse(&config.api_base)?;

        let http = HttpClientConfig::builder()
            .base_url(config.api_base.trim_end_matches('/'))
            .timeout(config.timeout)
            .accept_invalid_certs(config.insecure_skip_tls_verify)
            .build();

        Ok(Self {
            client: HttpClient::with_config(http)?,
            config,
        })
    }

    /// Render the message for a record with this notifier's settings
    pub fn render(&self, record: &TransferRecord) -> NotificationMessage {
        NotificationMessage::from_record(record, &self.config.explorer_base, &self.config.unit)
    }

    fn send_path(&self) -> String {
        format!("/bot{}/sendMessage", self.config.bot_token)
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, record: &TransferRecord) -> SendOutcome {
        let message = self.render(record);
        let payload = message.payload(&self.config.chat_id);

        let response = match self.client.post(&self.send_path(), payload).await {
            Ok(response) => response,
            Err(e) => {
                // reqwest renders the URL, which carries the bot token
                let reason = match e {
                    Error::Http(e) => e.without_url().to_string(),
                    other => other.to_string(),
                };
                warn!(tx_hash = %message.tx_hash, "Telegram request failed: {reason}");
                return SendOutcome::Failed { reason };
            }
        };

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        match status {
            StatusCode::OK => {
                info!(tx_hash = %message.tx_hash, "Telegram notification sent");
                SendOutcome::Delivered
            }
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after_secs =
                    extract_retry_after(&body).unwrap_or(self.config.default_retry_after_secs);
                warn!(
                    tx_hash = %message.tx_hash,
                    "Rate limited by Telegram, retry after {retry_after_secs}s"
                );
                SendOutcome::RateLimited { retry_after_secs }
            }
            other => {
                warn!(
                    tx_hash = %message.tx_hash,
                    "Failed to send Telegram notification: {} - {body}",
                    other.as_u16()
                );
                SendOutcome::Failed {
                    reason: format!("HTTP {}: {body}", other.as_u16()),
                }
            }
        }
    }
}

/// Read `parameters.retry_after` from a 429 body
pub(crate) fn extract_retry_after(body: &str) -> Option<u64> {
    let value: Value = serde_json::from_str(body).ok()?;
    let retry_after = value.get("parameters")?.get("retry_after")?;
    retry_after
        .as_u64()
        .or_else(|| retry_after.as_str().and_then(|s| s.trim().parse().ok()))
}
