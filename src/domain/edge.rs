//! Edge classification types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use super::market::MarketSnapshot;

/// Label shown when a result carries no tags.
pub const UNKNOWN_EDGE: &str = "UNKNOWN";

/// A classification tag for a detected edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeTag {
    /// Yes + No prices deviate from 1.0 by more than 2%.
    Mispricing,
    /// Yes price above 0.95 or below 0.05.
    Extreme,
    /// Thin liquidity with heavy volume.
    Catalyst,
    /// High volume turnover against deep liquidity.
    VolumeAnomaly,
    /// Market created less than 48 hours ago.
    NewMarket,
}

impl EdgeTag {
    /// Wire/display name of the tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mispricing => "MISPRICING",
            Self::Extreme => "EXTREME",
            Self::Catalyst => "CATALYST",
            Self::VolumeAnomaly => "VOLUME_ANOMALY",
            Self::NewMarket => "NEW_MARKET",
        }
    }
}

impl fmt::Display for EdgeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tags in detection order, without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeTags(Vec<EdgeTag>);

impl EdgeTags {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a tag, keeping first-seen order.
    pub fn push(&mut self, tag: EdgeTag) {
        if !self.0.contains(&tag) {
            self.0.push(tag);
        }
    }

    #[must_use]
    pub fn contains(&self, tag: EdgeTag) -> bool {
        self.0.contains(&tag)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[EdgeTag] {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl FromIterator<EdgeTag> for EdgeTags {
    fn from_iter<I: IntoIterator<Item = EdgeTag>>(iter: I) -> Self {
        let mut tags = Self::new();
        for tag in iter {
            tags.push(tag);
        }
        tags
    }
}

impl fmt::Display for EdgeTags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str(UNKNOWN_EDGE);
        }
        for (i, tag) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(tag.as_str())?;
        }
        Ok(())
    }
}

impl Serialize for EdgeTags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A scored market. Created once per poll cycle and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeResult {
    #[serde(flatten)]
    pub market: MarketSnapshot,
    pub edge_score: f64,
    #[serde(rename = "edgeType")]
    pub tags: EdgeTags,
    pub detected_at: DateTime<Utc>,
}

impl EdgeResult {
    /// Yes price of the underlying market.
    #[must_use]
    pub fn yes_price(&self) -> f64 {
        self.market.yes_price
    }
}
