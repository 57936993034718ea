//! Sync engine: mirrors the top edges to an [`EdgeSink`].

use std::sync::Arc;
use std::time::Duration;

use chrono::SecondsFormat;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use super::history::PriceHistory;
use super::rate_limit::{BackoffPolicy, RateLimitState};
use super::row::{build_row, format_price_change};
use super::status::SyncStatus;
use crate::application::cache::EdgeCache;
use crate::domain::EdgeResult;
use crate::error::SinkError;
use crate::port::{Clock, EdgeSink, SheetRow};

/// Default number of rows mirrored per sync.
pub const DEFAULT_MAX_ROWS: usize = 100;

/// Default base for market links.
pub const DEFAULT_MARKET_URL_BASE: &str = "https://polymarket.com/event";

/// Sync engine settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSettings {
    /// Rows written per sync; edges beyond this are dropped.
    pub max_rows: usize,
    /// Rate-limit backoff tuning.
    pub backoff: BackoffPolicy,
    /// Base URL for the URL column.
    pub market_url_base: String,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            max_rows: DEFAULT_MAX_ROWS,
            backoff: BackoffPolicy::default(),
            market_url_base: DEFAULT_MARKET_URL_BASE.to_string(),
        }
    }
}

/// Result of one sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Synced { rows_written: usize },
    Failed(SinkError),
}

impl SyncOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Synced { .. })
    }

    #[must_use]
    pub fn rows_written(&self) -> usize {
        match self {
            Self::Synced { rows_written } => *rows_written,
            Self::Failed(_) => 0,
        }
    }
}

/// Pushes ranked edges to a sink with delta tracking and adaptive backoff.
///
/// The engine exclusively owns its price history and rate-limit state; it is
/// driven by a single task through `&mut self`.
pub struct SyncEngine {
    sink: Arc<dyn EdgeSink>,
    clock: Arc<dyn Clock>,
    settings: SyncSettings,
    connected: bool,
    history: PriceHistory,
    rate_limit: RateLimitState,
}

impl SyncEngine {
    #[must_use]
    pub fn new(sink: Arc<dyn EdgeSink>, clock: Arc<dyn Clock>, settings: SyncSettings) -> Self {
        let rate_limit = RateLimitState::new(settings.backoff);
        Self {
            sink,
            clock,
            settings,
            connected: false,
            history: PriceHistory::new(),
            rate_limit,
        }
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    #[must_use]
    pub fn history(&self) -> &PriceHistory {
        &self.history
    }

    #[must_use]
    pub fn rate_limit(&self) -> &RateLimitState {
        &self.rate_limit
    }

    /// Mirror `edges` (already ranked) to the sink.
    ///
    /// Price history is updated before the write and is kept even if the
    /// write fails.
    pub async fn sync(&mut self, edges: &[EdgeResult]) -> SyncOutcome {
        if edges.is_empty() {
            debug!("No edge candidates to sync");
            return SyncOutcome::Synced { rows_written: 0 };
        }

        if !self.connected {
            if let Err(e) = self.sink.connect().await {
                warn!(sink = self.sink.sink_name(), error = %e, "Sink connect failed");
                return SyncOutcome::Failed(e);
            }
            info!(sink = self.sink.sink_name(), "Sink connected");
            self.connected = true;
        }

        let delay = self.rate_limit.current_delay();
        if !delay.is_zero() {
            info!(delay_ms = self.rate_limit.current_delay_ms(), "Rate limit delay");
            tokio::time::sleep(delay).await;
        }

        let rows = self.build_rows(edges);

        match self.sink.overwrite(&rows).await {
            Ok(()) => {
                self.rate_limit.record_success();
                info!(
                    sink = self.sink.sink_name(),
                    rows = rows.len(),
                    delay_ms = self.rate_limit.current_delay_ms(),
                    "Live update synced"
                );
                SyncOutcome::Synced {
                    rows_written: rows.len(),
                }
            }
            Err(e) => {
                if e.is_rate_limited() {
                    self.rate_limit.record_rate_limited();
                    warn!(
                        error = %e,
                        delay_ms = self.rate_limit.current_delay_ms(),
                        "Rate limit detected, backing off"
                    );
                } else {
                    warn!(sink = self.sink.sink_name(), error = %e, "Sink write failed");
                }
                SyncOutcome::Failed(e)
            }
        }
    }

    /// Sync the cached edges on a fixed interval until `shutdown` flips.
    ///
    /// The first sync runs immediately. A sync in progress always finishes
    /// before shutdown is observed.
    pub async fn run(
        mut self,
        cache: Arc<EdgeCache>,
        interval: Duration,
        status: Arc<SyncStatus>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(interval_ms = interval.as_millis() as u64, "Sheet sync started");

        loop {
            tokio::select! {
                biased;
                result = shutdown.changed() => {
                    if result.is_err() || *shutdown.borrow() {
                        info!("Sheet sync stopped");
                        break;
                    }
                }
                _ = ticker.tick() => {
                    let edges = cache.latest().map(|s| s.edges.clone()).unwrap_or_default();
                    let outcome = self.sync(&edges).await;
                    status.record(&outcome, self.clock.now(), self.rate_limit.current_delay_ms());
                }
            }
        }
    }

    fn build_rows(&mut self, edges: &[EdgeResult]) -> Vec<SheetRow> {
        let timestamp = self
            .clock
            .now()
            .to_rfc3339_opts(SecondsFormat::Millis, true);

        edges
            .iter()
            .take(self.settings.max_rows)
            .map(|edge| {
                let change = self.history.record(&edge.market.id, edge.yes_price());
                build_row(
                    edge,
                    format_price_change(change),
                    &timestamp,
                    &self.settings.market_url_base,
                )
            })
            .collect()
    }
}
