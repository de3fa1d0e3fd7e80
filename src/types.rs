//! Common types used throughout transfer-alerts
//!
//! This module contains the transfer row model and the small
//! serde helpers needed to read rows as PostgREST returns them.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ============================================================================
// Type Aliases
// ============================================================================

/// Lower bound (inclusive) of the next source query
pub type Cursor = DateTime<Utc>;

// ============================================================================
// Transfer Record
// ============================================================================

/// One row of the transfers table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    /// Transaction hash, the dedup identifier
    #[serde(default)]
    pub tx_hash: String,

    /// Sender address
    #[serde(default)]
    pub from_addr: String,

    /// Receiver address
    #[serde(default)]
    pub to_addr: String,

    /// Block the transfer was included in
    #[serde(default, deserialize_with = "de_u64_lenient")]
    pub block_number: u64,

    /// Amount as the source renders it (kept textual to avoid float rounding)
    #[serde(default = "default_amount", deserialize_with = "de_string_lenient")]
    pub amount: String,

    /// Row insertion time
    #[serde(deserialize_with = "de_timestamp")]
    pub created_at: DateTime<Utc>,
}

impl TransferRecord {
    /// Create a record (mostly for tests and fixtures)
    pub fn new(
        tx_hash: impl Into<String>,
        from_addr: impl Into<String>,
        to_addr: impl Into<String>,
        block_number: u64,
        amount: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            tx_hash: tx_hash.into(),
            from_addr: from_addr.into(),
            to_addr: to_addr.into(),
            block_number,
            amount: amount.into(),
            created_at,
        }
    }
}

fn default_amount() -> String {
    "0".to_string()
}

// ============================================================================
// Serde Helpers
// ============================================================================

/// Accept `"123"`, `123` or `null`
fn de_u64_lenient<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(0),
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| serde::de::Error::custom(format!("invalid block number: {n}"))),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid block number: {s}"))),
        other => Err(serde::de::Error::custom(format!(
            "invalid block number: {other}"
        ))),
    }
}

/// Accept strings and numbers, rendering numbers the way JSON wrote them
fn de_string_lenient<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(default_amount()),
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!("invalid amount: {other}"))),
    }
}

/// Parse an RFC 3339 timestamp; naive timestamps are taken as UTC
fn de_timestamp<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
}

/// Parse a timestamp as stored in the source or in the cursor file
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}
