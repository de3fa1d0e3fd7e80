//! Process configuration
//!
//! Assembles the settings for a run from CLI flags and the environment
//! (a `.env` file is loaded by `main` before parsing). Missing
//! credentials are reported as configuration errors before anything
//! touches the network.

use crate::cli::RunArgs;
use crate::engine::{FailurePolicy, PollConfig};
use crate::error::{Error, Result};
use crate::notify::TelegramConfig;
use crate::source::SupabaseConfig;
use std::path::PathBuf;
use std::time::Duration;

/// Fully validated settings for `run`
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory for persisted state
    pub state_dir: PathBuf,
    /// Transfer source connection
    pub supabase: SupabaseConfig,
    /// Notification endpoint
    pub telegram: TelegramConfig,
    /// Loop behaviour
    pub poll: PollConfig,
}

impl AppConfig {
    /// Build from parsed arguments, failing on missing credentials
    pub fn from_args(state_dir: PathBuf, args: &RunArgs) -> Result<Self> {
        let bot_token = required(args.bot_token.as_deref(), "TELEGRAM_BOT_TOKEN")?;
        let chat_id = required(args.chat_id.as_deref(), "TELEGRAM_CHANNEL_ID")?;
        let supabase_url = required(args.supabase_url.as_deref(), "SUPABASE_URL")?;
        let supabase_key = required(args.supabase_key.as_deref(), "SUPABASE_KEY")?;
        let timeout = Duration::from_secs(args.timeout);

        let supabase = SupabaseConfig::new(supabase_url, supabase_key)
            .table(args.table.clone())
            .timeout(timeout);

        let mut telegram = TelegramConfig::new(bot_token, chat_id)
            .api_base(args.telegram_api_url.clone())
            .explorer_base(args.explorer_url.clone())
            .unit(args.unit.clone())
            .insecure_skip_tls_verify(args.insecure_skip_tls_verify);
        telegram.default_retry_after_secs = args.default_retry_after;
        telegram.timeout = timeout;

        let poll = PollConfig {
            batch_limit: args.batch_limit,
            poll_interval: Duration::from_secs(args.poll_interval),
            send_delay: Duration::from_secs(args.send_delay),
            failure_policy: FailurePolicy {
                mark_failed_after: args.mark_failed_after,
            },
            max_processed: args.max_processed,
            keep_processed: args.keep_processed,
        };

        let config = Self {
            state_dir,
            supabase,
            telegram,
            poll,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the loop cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.poll.batch_limit == 0 {
            return Err(Error::invalid_value("batch_limit", "must be at least 1"));
        }
        if self.poll.failure_policy.mark_failed_after == 0 {
            return Err(Error::invalid_value(
                "mark_failed_after",
                "must be at least 1",
            ));
        }
        if self.poll.keep_processed == 0 {
            return Err(Error::invalid_value("keep_processed", "must be at least 1"));
        }
        if self.poll.keep_processed >= self.poll.max_processed {
            return Err(Error::invalid_value(
                "keep_processed",
                format!(
                    "must be smaller than max_processed ({})",
                    self.poll.max_processed
                ),
            ));
        }
        if self.supabase.timeout.is_zero() {
            return Err(Error::invalid_value("timeout", "must be at least 1 second"));
        }
        Ok(())
    }
}

fn required(value: Option<&str>, field: &str) -> Result<String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(Error::missing_field(field)),
    }
}
