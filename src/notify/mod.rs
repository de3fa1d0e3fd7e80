//! Notification module
//!
//! Turns transfer rows into Telegram messages and delivers them.
//!
//! # Overview
//!
//! The notify module provides:
//! - `NotificationMessage` - Fixed MarkdownV2 layout plus explorer buttons
//! - `Notifier` - Trait for a single delivery attempt
//! - `TelegramNotifier` - Bot API implementation with 429 detection

mod message;
mod telegram;

pub use message::{
    ensure_hex_prefix, escape_link_url, escape_markdown, truncate_address, InlineButton, NotificationMessage,
    DEFAULT_EXPLORER_URL,
};
pub use telegram::{TelegramConfig, TelegramNotifier, DEFAULT_RETRY_AFTER_SECS};

use crate::types::TransferRecord;
use async_trait::async_trait;

/// Result of one delivery attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Endpoint answered 200
    Delivered,
    /// Endpoint answered 429; retry the same record after the given delay
    RateLimited { retry_after_secs: u64 },
    /// Any other status, or a transport failure
    Failed { reason: String },
}

/// Delivers a single transfer notification
///
/// Implementations make exactly one attempt per call. Waiting out a
/// rate limit is the caller's job.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, record: &TransferRecord) -> SendOutcome;
}
