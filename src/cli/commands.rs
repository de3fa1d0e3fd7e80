//! CLI commands and argument parsing

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Forward new transfer rows to a Telegram chat
#[derive(Parser, Debug)]
#[command(name = "transfer-alerts")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding state.json and processed_txs.json
    #[arg(short, long, global = true, env = "STATE_DIR", default_value = ".")]
    pub state_dir: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Poll for new transfers and send notifications until interrupted
    Run(RunArgs),

    /// Show the persisted cursor and processed-set size
    State,

    /// Delete persisted state so the next run starts from now
    Reset,
}

/// Arguments for `run`
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Telegram bot token
    #[arg(long, env = "TELEGRAM_BOT_TOKEN", hide_env_values = true)]
    pub bot_token: Option<String>,

    /// Telegram chat or channel id
    #[arg(long, env = "TELEGRAM_CHANNEL_ID")]
    pub chat_id: Option<String>,

    /// Supabase project URL
    #[arg(long, env = "SUPABASE_URL")]
    pub supabase_url: Option<String>,

    /// Supabase API key
    #[arg(long, env = "SUPABASE_KEY", hide_env_values = true)]
    pub supabase_key: Option<String>,

    /// Table holding transfer rows
    #[arg(long, env = "TRANSFERS_TABLE", default_value = "transfers")]
    pub table: String,

    /// Rows fetched per cycle
    #[arg(long, default_value = "10")]
    pub batch_limit: usize,

    /// Seconds between poll cycles
    #[arg(long, default_value = "10")]
    pub poll_interval: u64,

    /// Seconds to wait before each send
    #[arg(long, default_value = "3")]
    pub send_delay: u64,

    /// Seconds to wait on a 429 without retry_after
    #[arg(long, default_value = "30")]
    pub default_retry_after: u64,

    /// Mark a record processed after this many failed deliveries
    #[arg(long, default_value = "1")]
    pub mark_failed_after: u32,

    /// Prune the processed set once it grows past this size
    #[arg(long, default_value = "1000")]
    pub max_processed: usize,

    /// Entries kept after pruning
    #[arg(long, default_value = "500")]
    pub keep_processed: usize,

    /// Block explorer base URL
    #[arg(long, env = "EXPLORER_URL", default_value = "https://testnet.monadexplorer.com")]
    pub explorer_url: String,

    /// Telegram Bot API base URL
    #[arg(long, env = "TELEGRAM_API_URL", default_value = "https://api.telegram.org")]
    pub telegram_api_url: String,

    /// Unit label shown after amounts
    #[arg(long, default_value = "MON")]
    pub unit: String,

    /// HTTP request timeout in seconds
    #[arg(long, default_value = "30")]
    pub timeout: u64,

    /// Skip TLS certificate verification for Telegram (development only)
    #[arg(long, env = "INSECURE_SKIP_TLS_VERIFY")]
    pub insecure_skip_tls_verify: bool,
}
