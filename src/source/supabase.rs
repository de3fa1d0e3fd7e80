//! Supabase (PostgREST) transfer source

use super::TransferSource;
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig, RequestConfig};
use crate::types::{Cursor, TransferRecord};
use async_trait::async_trait;
use chrono::SecondsFormat;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Connection settings for the Supabase REST API
#[derive(Clone)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`
    pub url: String,
    /// Service or anon key
    pub key: String,
    /// Table holding transfer rows
    pub table: String,
    /// Column ordered and filtered on
    pub time_column: String,
    /// Request timeout
    pub timeout: Duration,
}

impl SupabaseConfig {
    pub fn new(url: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            key: key.into(),
            table: "transfers".to_string(),
            time_column: "created_at".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    #[must_use]
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl std::fmt::Debug for SupabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseConfig")
            .field("url", &self.url)
            .field("table", &self.table)
            .field("time_column", &self.time_column)
            .finish_non_exhaustive()
    }
}

/// Reads transfer rows through PostgREST
#[derive(Debug, Clone)]
pub struct SupabaseSource {
    client: HttpClient,
    table: String,
    time_column: String,
}

impl SupabaseSource {
    /// Create a source from connection settings
    pub fn new(config: SupabaseConfig) -> Result<Self> {
        url::Url::parse(&config.url)?;

        let http = HttpClientConfig::builder()
            .base_url(config.url.trim_end_matches('/'))
            .timeout(config.timeout)
            .header("apikey", config.key.clone())
            .header("Authorization", format!("Bearer {}", config.key))
            .header("Accept", "application/json")
            .build();

        Ok(Self {
            client: HttpClient::with_config(http)?,
            table: config.table,
            time_column: config.time_column,
        })
    }

    fn request_for(&self, cursor: Cursor, limit: usize) -> RequestConfig {
        let bound = cursor.to_rfc3339_opts(SecondsFormat::AutoSi, true);
        RequestConfig::new()
            .query("select", "*")
            .query(self.time_column.as_str(), format!("gte.{bound}"))
            .query("order", format!("{}.asc", self.time_column))
            .query("limit", limit.to_string())
    }
}

#[async_trait]
impl TransferSource for SupabaseSource {
    async fn fetch_since(&self, cursor: Cursor, limit: usize) -> Result<Vec<TransferRecord>> {
        let path = format!("/rest/v1/{}", self.table);
        debug!(%cursor, limit, "Querying {}", self.table);

        let response = self
            .client
            .get_with_config(&path, self.request_for(cursor, limit))
            .await
            .map_err(|e| Error::source_unavailable(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::source_unavailable(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(Error::source_unavailable(format!(
                "HTTP {}: {body}",
                status.as_u16()
            )));
        }

        let rows: Vec<Value> = serde_json::from_str(&body)
            .map_err(|e| Error::unexpected_data(format!("Failed to decode rows: {e}")))?;
        let mut records: Vec<TransferRecord> = rows.into_iter().filter_map(decode_row).collect();

        // PostgREST honours the order param; keep the invariant even if a proxy does not
        records.sort_by_key(|r| r.created_at);
        records.truncate(limit);
        Ok(records)
    }
}

/// Decode one row, dropping it with a warning if it does not fit the model
///
/// A single bad row must not fail the batch, or the cursor would never
/// move past it.
fn decode_row(row: Value) -> Option<TransferRecord> {
    let tx_hash = row
        .get("tx_hash")
        .and_then(Value::as_str)
        .unwrap_or("<unknown>")
        .to_string();

    match serde_json::from_value(row) {
        Ok(record) => Some(record),
        Err(e) => {
            warn!(%tx_hash, "Skipping undecodable transfer row: {e}");
            None
        }
    }
}
