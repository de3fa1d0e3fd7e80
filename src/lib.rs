// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Transfer Alerts
//!
//! Watches a Supabase `transfers` table and forwards each newly inserted
//! row to a Telegram chat, once, across restarts.
//!
//! ## Features
//!
//! - **Incremental Polling**: Cursor-based range reads, oldest first
//! - **Dedup State**: Persisted, bounded set of already-notified hashes
//! - **Rate-Limit Backoff**: 429 `retry_after` is waited out and the same record resent
//! - **Crash Safety**: Temp-file-then-rename writes for both state documents
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use transfer_alerts::engine::{PollConfig, PollLoop};
//! use transfer_alerts::notify::{TelegramConfig, TelegramNotifier};
//! use transfer_alerts::source::{SupabaseConfig, SupabaseSource};
//! use transfer_alerts::state::StateStore;
//!
//! #[tokio::main]
//! async fn main() -> transfer_alerts::Result<()> {
//!     let source = SupabaseSource::new(SupabaseConfig::new(url, key))?;
//!     let notifier = TelegramNotifier::new(TelegramConfig::new(token, chat_id))?;
//!     let store = StateStore::new(".");
//!
//!     let mut poller = PollLoop::init(source, notifier, store, PollConfig::default()).await?;
//!     poller.run().await
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                        PollLoop                           │
//! │  fetch_since → skip seen → throttle → send → persist      │
//! └───────────────────────────────────────────────────────────┘
//!          │                    │                     │
//! ┌────────┴───────┐   ┌────────┴────────┐   ┌────────┴───────┐
//! │ TransferSource │   │    Notifier     │   │   StateStore   │
//! ├────────────────┤   ├─────────────────┤   ├────────────────┤
//! │ Supabase REST  │   │ Telegram Bot API│   │ state.json     │
//! │ gte/order/limit│   │ MarkdownV2, 429 │   │ processed_txs  │
//! └────────────────┘   └─────────────────┘   └────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Shared HTTP client
pub mod http;

/// Transfer row sources
pub mod source;

/// Message rendering and delivery
pub mod notify;

/// Cursor and dedup persistence
pub mod state;

/// The poll loop
pub mod engine;

/// Process configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
