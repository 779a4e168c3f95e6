//! Write Loop
//!
//! Forever: generate a UUID v4 key, SET `value: <key>` under it, log the
//! result. A successful write is followed by a pause of `interval`; a failed
//! write is logged and the next iteration starts immediately.

use std::time::Duration;

use uuid::Uuid;

use crate::error::Error;
use crate::store::KvStore;

/// Log running totals every this many iterations (debug level)
const STATS_LOG_EVERY: u64 = 100;

/// Result of a single iteration
#[derive(Debug)]
pub enum IterationOutcome {
    Written { key: String },
    Failed { key: String, error: Error },
}

impl IterationOutcome {
    #[inline]
    pub fn is_written(&self) -> bool {
        matches!(self, Self::Written { .. })
    }
}

/// Counters since the loop was created
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub written: u64,
    pub failed: u64,
}

impl LoopStats {
    #[inline]
    pub fn iterations(&self) -> u64 {
        self.written + self.failed
    }
}

pub struct WriteLoop<S> {
    store: S,
    interval: Duration,
    stats: LoopStats,
}

impl<S: KvStore> WriteLoop<S> {
    pub fn new(store: S, interval: Duration) -> Self {
        Self {
            store,
            interval,
            stats: LoopStats::default(),
        }
    }

    /// Fresh key and the value written under it
    pub fn next_entry() -> (String, String) {
        let key = Uuid::new_v4().to_string();
        let value = format!("value: {}", key);
        (key, value)
    }

    /// Perform one write and log its outcome. Never sleeps.
    pub async fn run_once(&mut self) -> IterationOutcome {
        let (key, value) = Self::next_entry();

        let outcome = match self.store.set(&key, &value).await {
            Ok(()) => {
                self.stats.written += 1;
                log::info!("Set: {}", key);
                IterationOutcome::Written { key }
            }
            Err(error) => {
                self.stats.failed += 1;
                log::error!("{}", error);
                IterationOutcome::Failed { key, error }
            }
        };

        if self.stats.iterations() % STATS_LOG_EVERY == 0 {
            log::debug!(
                "{} iterations: {} written, {} failed",
                self.stats.iterations(),
                self.stats.written,
                self.stats.failed
            );
        }

        outcome
    }

    /// Run until the process is terminated (or the future is dropped)
    pub async fn run(&mut self) {
        loop {
            // Failures retry without pausing
            if self.run_once().await.is_written() {
                tokio::time::sleep(self.interval).await;
            }
        }
    }

    pub fn stats(&self) -> LoopStats {
        self.stats
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
