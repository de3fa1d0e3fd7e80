//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, RunArgs};
use crate::config::AppConfig;
use crate::engine::PollLoop;
use crate::error::Result;
use crate::notify::TelegramNotifier;
use crate::source::SupabaseSource;
use crate::state::StateStore;
use std::future::Future;
use tokio::sync::watch;
use tracing::{info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Run(args) => self.poll(args).await,
            Commands::State => self.show_state().await,
            Commands::Reset => self.reset().await,
        }
    }

    fn store(&self) -> StateStore {
        StateStore::new(&self.cli.state_dir)
    }

    /// Start the long-lived poller
    async fn poll(&self, args: &RunArgs) -> Result<()> {
        let config = AppConfig::from_args(self.cli.state_dir.clone(), args)?;

        if self.cli.verbose {
            info!(?config.supabase, ?config.telegram, "Loaded configuration");
        }

        let source = SupabaseSource::new(config.supabase)?;
        let notifier = TelegramNotifier::new(config.telegram)?;

        let (stop_tx, stop_rx) = watch::channel(false);
        tokio::spawn(async move {
            forward_interrupt(tokio::signal::ctrl_c(), stop_tx).await;
        });

        let mut poller = PollLoop::init(source, notifier, self.store(), config.poll)
            .await?
            .with_shutdown(stop_rx);
        poller.run().await?;

        info!("Bot stopped by user. Goodbye!");
        Ok(())
    }

    /// Print persisted state
    async fn show_state(&self) -> Result<()> {
        let store = self.store();
        let cursor = store.load_cursor().await;
        let processed = store.load_processed().await;

        match cursor {
            Some(cursor) => println!("Cursor: {}", cursor.to_rfc3339()),
            None => println!("Cursor: <none>"),
        }
        println!("Processed transactions: {}", processed.len());
        if let Some(newest) = processed.iter().last() {
            println!("Most recent: {newest}");
        }
        Ok(())
    }

    /// Remove persisted state
    async fn reset(&self) -> Result<()> {
        let store = self.store();
        store.clear().await?;
        println!(
            "Removed {} and {}",
            store.cursor_path().display(),
            store.processed_path().display()
        );
        Ok(())
    }
}

/// Set the stop flag once `signal` fires
///
/// If the signal handler cannot be installed the flag is left alone and the
/// sender is held forever, so the poller keeps running.
async fn forward_interrupt<F>(signal: F, stop_tx: watch::Sender<bool>)
where
    F: Future<Output = std::io::Result<()>>,
{
    match signal.await {
        Ok(()) => {
            info!("Interrupt received, stopping after the current step");
            let _ = stop_tx.send(true);
        }
        Err(e) => {
            warn!("Failed to listen for Ctrl-C, the poller cannot be interrupted: {e}");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_interrupt_sets_stop_flag() {
        let (tx, rx) = watch::channel(false);
        forward_interrupt(async { Ok(()) }, tx).await;
        assert!(*rx.borrow());
    }

    #[tokio::test(start_paused = true)]
    async fn test_signal_setup_failure_keeps_running() {
        let (tx, mut rx) = watch::channel(false);
        let task = tokio::spawn(forward_interrupt(
            async { Err(std::io::Error::other("no signal handler")) },
            tx,
        ));

        tokio::time::sleep(Duration::from_secs(3600)).await;

        assert!(!*rx.borrow());
        // Sender still alive: no change and not closed
        assert_eq!(rx.has_changed().ok(), Some(false));
        let waited = tokio::time::timeout(Duration::from_secs(60), rx.changed()).await;
        assert!(waited.is_err());

        task.abort();
    }
}
