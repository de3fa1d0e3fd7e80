// Allow common clippy pedantic lints
#![allow(clippy::must_use_candidate)]
#![allow(clippy::unused_async)]

//! transfer-alerts CLI
//!
//! Polls for new transfers and forwards them to Telegram

use clap::Parser;
use transfer_alerts::cli::{Cli, Runner};

#[tokio::main]
async fn main() {
    // .env is optional; real environment variables win
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    let runner = Runner::new(cli);

    if let Err(e) = runner.run().await {
        eprintln!("Error: {e}");
        std::process::exit(if e.is_config() { 2 } else { 1 });
    }
}
