//! Per-market price history for delta tracking between syncs.

use std::collections::HashMap;

use crate::domain::MarketId;

/// Last synced yes price per market.
///
/// Entries are created on first sight and never removed; the market
/// population is small enough for that to be fine.
#[derive(Debug, Clone, Default)]
pub struct PriceHistory {
    last: HashMap<MarketId, f64>,
}

impl PriceHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `price` for `market` and return the percent change against the
    /// previous record.
    ///
    /// Returns `None` on first sight, or when the previous price cannot be
    /// divided by.
    pub fn record(&mut self, market: &MarketId, price: f64) -> Option<f64> {
        let prior = self.last.insert(market.clone(), price)?;
        if prior == 0.0 || !prior.is_finite() {
            return None;
        }
        Some((price - prior) / prior * 100.0)
    }

    #[must_use]
    pub fn get(&self, market: &MarketId) -> Option<f64> {
        self.last.get(market).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.last.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.last.is_empty()
    }
}
