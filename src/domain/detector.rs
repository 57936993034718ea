//! Edge detection over a batch of raw markets.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use super::edge::EdgeResult;
use super::market::{MarketSnapshot, RawMarket};
use super::score::score;

/// Normalize every raw market that has a resolvable Yes/No pair.
#[must_use]
pub fn normalize(markets: &[RawMarket]) -> Vec<MarketSnapshot> {
    markets.iter().filter_map(MarketSnapshot::from_raw).collect()
}

/// Detect edges in a batch of raw markets.
///
/// Markets without a Yes/No pair are skipped. Results with a zero score are
/// dropped; the rest are ordered by descending score, ties keeping input order.
#[must_use]
pub fn detect(markets: &[RawMarket], now: DateTime<Utc>) -> Vec<EdgeResult> {
    detect_snapshots(normalize(markets), now)
}

/// Detect edges in already-normalized snapshots.
#[must_use]
pub fn detect_snapshots(
    snapshots: impl IntoIterator<Item = MarketSnapshot>,
    now: DateTime<Utc>,
) -> Vec<EdgeResult> {
    let mut edges: Vec<EdgeResult> = snapshots
        .into_iter()
        .filter_map(|market| {
            let scored = score(&market, now);
            (scored.score > 0.0).then(|| EdgeResult {
                market,
                edge_score: scored.score,
                tags: scored.tags,
                detected_at: now,
            })
        })
        .collect();

    // sort_by is stable
    edges.sort_by(|a, b| {
        b.edge_score
            .partial_cmp(&a.edge_score)
            .unwrap_or(Ordering::Equal)
    });
    edges
}
