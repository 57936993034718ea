//! Poll orchestration: fetch → score → publish.
//!
//! One cycle runs at a time. Each completed cycle atomically replaces the
//! cached snapshot and is fanned out to subscribers. A failed fetch leaves
//! the previous snapshot in place; the next tick is the retry.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use super::cache::{EdgeCache, PollSnapshot};
use super::fanout::Publisher;
use crate::domain::{detect_snapshots, normalize};
use crate::error::Error;
use crate::port::{Clock, MarketSource};

/// Lifecycle of a poll cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Idle,
    Fetching,
    Scoring,
    Published,
}

impl fmt::Display for PollState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Fetching => "fetching",
            Self::Scoring => "scoring",
            Self::Published => "published",
        };
        f.write_str(name)
    }
}

/// Why a poll cycle produced no snapshot.
#[derive(Error, Debug)]
pub enum PollError {
    #[error("poll cycle already in flight")]
    InFlight,

    #[error("market fetch failed: {0}")]
    Fetch(#[source] Error),
}

/// Drives poll cycles and owns the write side of the [`EdgeCache`].
pub struct PollOrchestrator {
    source: Arc<dyn MarketSource>,
    cache: Arc<EdgeCache>,
    publisher: Arc<Publisher>,
    clock: Arc<dyn Clock>,
    state: Mutex<PollState>,
    cycle: tokio::sync::Mutex<()>,
}

/// Returns the state to idle when a cycle ends, including on cancellation.
struct CycleGuard<'a> {
    state: &'a Mutex<PollState>,
    _cycle: tokio::sync::MutexGuard<'a, ()>,
}

impl CycleGuard<'_> {
    fn enter(&self, next: PollState) {
        *self.state.lock() = next;
    }
}

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        *self.state.lock() = PollState::Idle;
    }
}

impl PollOrchestrator {
    #[must_use]
    pub fn new(
        source: Arc<dyn MarketSource>,
        cache: Arc<EdgeCache>,
        publisher: Arc<Publisher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            source,
            cache,
            publisher,
            clock,
            state: Mutex::new(PollState::Idle),
            cycle: tokio::sync::Mutex::new(()),
        }
    }

    /// Current cycle state.
    #[must_use]
    pub fn state(&self) -> PollState {
        *self.state.lock()
    }

    /// Read side of the cache this orchestrator publishes into.
    #[must_use]
    pub fn cache(&self) -> &Arc<EdgeCache> {
        &self.cache
    }

    /// Run a single fetch → score → publish cycle.
    ///
    /// Returns [`PollError::InFlight`] without doing anything if another
    /// cycle is still running.
    pub async fn poll_once(&self) -> Result<Arc<PollSnapshot>, PollError> {
        let Ok(cycle) = self.cycle.try_lock() else {
            debug!("Poll already in flight, skipping");
            return Err(PollError::InFlight);
        };
        let guard = CycleGuard {
            state: &self.state,
            _cycle: cycle,
        };

        guard.enter(PollState::Fetching);
        debug!(source = self.source.source_name(), "Fetching markets");
        let raw = match self.source.fetch_markets().await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(
                    source = self.source.source_name(),
                    error = %e,
                    "Market fetch failed; keeping previous snapshot"
                );
                return Err(PollError::Fetch(e));
            }
        };

        guard.enter(PollState::Scoring);
        let now = self.clock.now();
        let markets = normalize(&raw);
        let edges = detect_snapshots(markets.iter().cloned(), now);
        let snapshot = Arc::new(PollSnapshot {
            fetched: raw.len(),
            markets,
            edges,
            polled_at: now,
        });

        self.cache.replace(Arc::clone(&snapshot));
        guard.enter(PollState::Published);
        let subscribers = self.publisher.publish(Arc::clone(&snapshot));

        info!(
            fetched = snapshot.fetched,
            markets = snapshot.markets.len(),
            edges = snapshot.edges.len(),
            subscribers,
            "Poll cycle published"
        );

        Ok(snapshot)
    }

    /// Poll on a fixed interval until `shutdown` flips to true.
    ///
    /// The first cycle runs immediately. Ticks missed while a slow cycle is
    /// running are skipped rather than queued.
    pub async fn run(&self, interval: Duration, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(interval_ms = interval.as_millis() as u64, "Polling started");

        loop {
            tokio::select! {
                biased;
                result = shutdown.changed() => {
                    if result.is_err() || *shutdown.borrow() {
                        info!("Polling stopped");
                        break;
                    }
                }
                _ = ticker.tick() => {
                    // errors are logged inside; the next tick retries
                    let _ = self.poll_once().await;
                }
            }
        }
    }
}
