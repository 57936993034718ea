//! Last-write-wins cache of the latest poll cycle.
//!
//! Each cycle publishes a fresh [`PollSnapshot`] that replaces the previous
//! one wholesale. Readers clone the `Arc` and keep a consistent view even if
//! a newer cycle lands while they are still using it.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;

use crate::domain::{EdgeResult, MarketSnapshot};

/// Everything one completed poll cycle produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PollSnapshot {
    /// Binary markets that normalized successfully.
    pub markets: Vec<MarketSnapshot>,
    /// Edges ranked by descending score.
    pub edges: Vec<EdgeResult>,
    /// Number of raw records fetched upstream.
    pub fetched: usize,
    /// When the cycle completed.
    #[serde(rename = "lastUpdate")]
    pub polled_at: DateTime<Utc>,
}

/// Thread-safe holder of the latest [`PollSnapshot`].
#[derive(Debug, Default)]
pub struct EdgeCache {
    latest: RwLock<Option<Arc<PollSnapshot>>>,
}

impl EdgeCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a new snapshot.
    pub fn replace(&self, snapshot: Arc<PollSnapshot>) {
        *self.latest.write() = Some(snapshot);
    }

    /// The latest snapshot, if any cycle has completed.
    #[must_use]
    pub fn latest(&self) -> Option<Arc<PollSnapshot>> {
        self.latest.read().clone()
    }

    /// Up to `limit` of the highest-scoring edges.
    #[must_use]
    pub fn latest_edges(&self, limit: usize) -> Vec<EdgeResult> {
        self.latest()
            .map(|s| s.edges.iter().take(limit).cloned().collect())
            .unwrap_or_default()
    }

    /// Completion time of the latest cycle.
    #[must_use]
    pub fn last_poll_at(&self) -> Option<DateTime<Utc>> {
        self.latest.read().as_ref().map(|s| s.polled_at)
    }

    /// Number of edges in the latest cycle.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.latest.read().as_ref().map_or(0, |s| s.edges.len())
    }

    /// Number of normalized markets in the latest cycle.
    #[must_use]
    pub fn market_count(&self) -> usize {
        self.latest.read().as_ref().map_or(0, |s| s.markets.len())
    }
}
