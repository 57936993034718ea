//! Edge sink port.
//!
//! A sink mirrors the latest ranked edges somewhere durable (a spreadsheet
//! in production). It has no append semantics: every write replaces all
//! previously written rows.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::SinkError;

/// Column headers, in sink order.
pub const SHEET_HEADERS: [&str; 11] = [
    "Market Title",
    "Yes Price",
    "No Price",
    "Volume 24h",
    "Liquidity",
    "Edge Score",
    "Edge Type",
    "Last Updated",
    "Price Change",
    "Market ID",
    "URL",
];

/// One formatted sink row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetRow {
    pub title: String,
    pub yes_price: String,
    pub no_price: String,
    pub volume_24h: String,
    pub liquidity: String,
    pub edge_score: String,
    pub edge_type: String,
    pub last_updated: String,
    pub price_change: String,
    pub market_id: String,
    pub url: String,
}

impl SheetRow {
    /// Cell values in [`SHEET_HEADERS`] order.
    #[must_use]
    pub fn to_values(&self) -> Vec<String> {
        vec![
            self.title.clone(),
            self.yes_price.clone(),
            self.no_price.clone(),
            self.volume_24h.clone(),
            self.liquidity.clone(),
            self.edge_score.clone(),
            self.edge_type.clone(),
            self.last_updated.clone(),
            self.price_change.clone(),
            self.market_id.clone(),
            self.url.clone(),
        ]
    }

    /// Rebuild a row from cell values; missing trailing cells are empty.
    #[must_use]
    pub fn from_values(values: &[String]) -> Self {
        let cell = |i: usize| values.get(i).cloned().unwrap_or_default();
        Self {
            title: cell(0),
            yes_price: cell(1),
            no_price: cell(2),
            volume_24h: cell(3),
            liquidity: cell(4),
            edge_score: cell(5),
            edge_type: cell(6),
            last_updated: cell(7),
            price_change: cell(8),
            market_id: cell(9),
            url: cell(10),
        }
    }
}

/// Durable mirror for ranked edges.
#[async_trait]
pub trait EdgeSink: Send + Sync {
    /// Establish the connection. Called once before the first write; calling
    /// it again after success must be harmless.
    async fn connect(&self) -> Result<(), SinkError>;

    /// Replace every previously written row with `rows`.
    async fn overwrite(&self, rows: &[SheetRow]) -> Result<(), SinkError>;

    /// Read back up to `limit` of the most recently written rows.
    async fn recent_rows(&self, limit: usize) -> Result<Vec<SheetRow>, SinkError>;

    /// Get the sink name for logging/debugging.
    fn sink_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_follow_header_order() {
        let row = SheetRow {
            title: "T".into(),
            market_id: "m1".into(),
            url: "u".into(),
            ..Default::default()
        };
        let values = row.to_values();
        assert_eq!(values.len(), SHEET_HEADERS.len());
        assert_eq!(values[0], "T");
        assert_eq!(values[9], "m1");
        assert_eq!(values[10], "u");
    }

    #[test]
    fn from_values_pads_missing_cells() {
        let row = SheetRow::from_values(&["Only title".to_string()]);
        assert_eq!(row.title, "Only title");
        assert!(row.url.is_empty());
    }
}
