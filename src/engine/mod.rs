//! Execution engine module
//!
//! The poll loop: read → dedup → send → advance cursor → persist.
//!
//! # Overview
//!
//! The engine module provides:
//! - `PollLoop` - Owns the source, notifier and state store for the process lifetime
//! - `PollConfig` - Batch size, delays, pruning bounds and failure policy
//! - `CycleStats` - Per-cycle counters
//!
//! Everything runs on one task. The inter-cycle sleep, the per-send
//! throttle and rate-limit waits all suspend the whole loop, and each of
//! them is a point where a shutdown request is honoured.

mod types;

pub use types::{CycleStats, FailurePolicy, PollConfig};

use crate::error::Result;
use crate::notify::{Notifier, SendOutcome};
use crate::source::TransferSource;
use crate::state::{ProcessedSet, StateStore};
use crate::types::{Cursor, TransferRecord};
use chrono::Utc;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

/// Result of delivering one record, rate limits included
enum Delivery {
    Delivered,
    Failed(String),
    Interrupted,
}

/// Long-lived polling pipeline
pub struct PollLoop<S, N> {
    source: S,
    notifier: N,
    store: StateStore,
    config: PollConfig,
    cursor: Cursor,
    processed: ProcessedSet,
    /// Failed attempts for records not yet given up on
    failures: HashMap<String, u32>,
    shutdown: Option<watch::Receiver<bool>>,
}

impl<S: TransferSource, N: Notifier> PollLoop<S, N> {
    /// Load persisted state and build the loop
    ///
    /// A missing cursor starts at the current time and is written out
    /// immediately, so repeated crashes do not keep moving it forward.
    pub async fn init(
        source: S,
        notifier: N,
        store: StateStore,
        config: PollConfig,
    ) -> Result<Self> {
        let processed = store.load_processed().await;

        let cursor = match store.load_cursor().await {
            Some(cursor) => {
                info!(%cursor, "Resuming from persisted cursor");
                cursor
            }
            None => {
                let now = Utc::now();
                store.save_cursor(now).await?;
                info!(cursor = %now, "No prior cursor, starting from now");
                now
            }
        };

        info!(
            processed = processed.len(),
            "Loaded processed transaction set"
        );

        Ok(Self {
            source,
            notifier,
            store,
            config,
            cursor,
            processed,
            failures: HashMap::new(),
            shutdown: None,
        })
    }

    /// Stop at the next suspension point once the flag turns true
    #[must_use]
    pub fn with_shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn processed(&self) -> &ProcessedSet {
        &self.processed
    }

    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Poll until shutdown
    ///
    /// Cycle errors are logged and the loop carries on after the usual delay.
    pub async fn run(&mut self) -> Result<()> {
        info!("Starting transfer polling");

        loop {
            match self.run_cycle().await {
                Ok(stats) if stats.interrupted => break,
                Ok(stats) if stats.is_empty() => debug!("No new transfers"),
                Ok(stats) => info!(
                    fetched = stats.fetched,
                    delivered = stats.delivered,
                    skipped = stats.skipped,
                    failed = stats.failed,
                    rate_limited = stats.rate_limited,
                    cursor = %self.cursor,
                    "Cycle complete"
                ),
                Err(e) if e.is_retryable() => warn!("Polling error, retrying next cycle: {e}"),
                Err(e) => error!("Polling error: {e}"),
            }

            if !self.pause(self.config.poll_interval).await {
                break;
            }
        }

        info!("Poller stopped");
        Ok(())
    }

    /// Run a single read → send → persist cycle
    pub async fn run_cycle(&mut self) -> Result<CycleStats> {
        let mut stats = CycleStats::default();

        let records = self
            .source
            .fetch_since(self.cursor, self.config.batch_limit)
            .await?;
        stats.fetched = records.len();

        if records.is_empty() {
            return Ok(stats);
        }
        info!("Found {} transfers to process", records.len());

        let mut max_seen: Option<Cursor> = None;

        for record in &records {
            if self.processed.contains(&record.tx_hash) {
                debug!(tx_hash = %record.tx_hash, "Skipping already processed tx");
                stats.skipped += 1;
                continue;
            }

            if !self.pause(self.config.send_delay).await {
                stats.interrupted = true;
                break;
            }

            match self.deliver(record, &mut stats).await {
                Delivery::Delivered => {
                    stats.delivered += 1;
                    self.failures.remove(&record.tx_hash);
                }
                Delivery::Failed(reason) => {
                    stats.failed += 1;
                    let failures = self.failures.entry(record.tx_hash.clone()).or_insert(0);
                    *failures += 1;

                    if !self.config.failure_policy.should_give_up(*failures) {
                        warn!(
                            tx_hash = %record.tx_hash,
                            attempts = *failures,
                            "Delivery failed, retrying next cycle: {reason}"
                        );
                        stats.deferred = true;
                        break;
                    }

                    warn!(
                        tx_hash = %record.tx_hash,
                        attempts = *failures,
                        "Delivery failed, marking processed: {reason}"
                    );
                    self.failures.remove(&record.tx_hash);
                }
                Delivery::Interrupted => {
                    stats.interrupted = true;
                    break;
                }
            }

            self.processed.insert(record.tx_hash.clone());
            self.store.save_processed(&self.processed).await?;

            max_seen = max_seen.max(Some(record.created_at));
        }

        if let Some(max_seen) = max_seen {
            if max_seen > self.cursor {
                self.cursor = max_seen;
                self.store.save_cursor(self.cursor).await?;
            }
        }

        if self
            .processed
            .prune(self.config.max_processed, self.config.keep_processed)
        {
            info!(
                kept = self.processed.len(),
                "Pruned processed transaction set"
            );
            self.store.save_processed(&self.processed).await?;
        }

        Ok(stats)
    }

    /// Send one record, waiting out rate limits until a final answer
    async fn deliver(&mut self, record: &TransferRecord, stats: &mut CycleStats) -> Delivery {
        loop {
            match self.notifier.send(record).await {
                SendOutcome::Delivered => return Delivery::Delivered,
                SendOutcome::Failed { reason } => return Delivery::Failed(reason),
                SendOutcome::RateLimited { retry_after_secs } => {
                    stats.rate_limited += 1;
                    info!(
                        tx_hash = %record.tx_hash,
                        "Rate limited, waiting {retry_after_secs} seconds..."
                    );
                    if !self.pause(Duration::from_secs(retry_after_secs)).await {
                        return Delivery::Interrupted;
                    }
                }
            }
        }
    }

    /// Sleep for `duration`. Returns false if shutdown was requested.
    async fn pause(&mut self, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;

        let Some(shutdown) = self.shutdown.as_mut() else {
            tokio::time::sleep_until(deadline).await;
            return true;
        };

        if *shutdown.borrow() {
            return false;
        }

        let stopped = tokio::select! {
            () = tokio::time::sleep_until(deadline) => return true,
            changed = shutdown.wait_for(|stop| *stop) => changed.is_ok(),
        };
        if stopped {
            return false;
        }

        // Sender gone: nobody can ask us to stop any more
        tokio::time::sleep_until(deadline).await;
        true
    }
}
