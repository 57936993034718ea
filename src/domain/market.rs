//! Market-related domain types.
//!
//! - [`RawMarket`] - An upstream market record with its numeric fields still textual
//! - [`RawOutcome`] - One named outcome of a raw market
//! - [`MarketSnapshot`] - The normalized, scoreable view of a binary market
//!
//! Parsing is total: every numeric field either resolves to a finite value
//! or falls back to a defined default. A market whose Yes/No prices cannot
//! both be resolved produces no snapshot at all.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::id::MarketId;

const YES: &str = "Yes";
const NO: &str = "No";

/// Title used when the upstream record has neither a question nor a title.
pub const UNTITLED: &str = "Untitled";

/// A single outcome within a raw market record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawOutcome {
    /// Outcome name, e.g. "Yes" or "No".
    pub name: String,
    /// Price as delivered upstream, if any.
    pub price: Option<String>,
}

impl RawOutcome {
    /// Create a new outcome.
    pub fn new(name: impl Into<String>, price: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            price: Some(price.into()),
        }
    }
}

/// A market record as fetched from upstream, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawMarket {
    pub id: String,
    pub question: Option<String>,
    pub title: Option<String>,
    pub created_at: Option<String>,
    pub outcomes: Vec<RawOutcome>,
    pub volume_24h: Option<String>,
    pub liquidity: Option<String>,
}

impl RawMarket {
    fn outcome_price(&self, name: &str) -> Option<f64> {
        self.outcomes
            .iter()
            .find(|o| o.name == name)
            .and_then(|o| o.price.as_deref())
            .and_then(parse_price)
    }
}

/// Normalized view of one binary market for a single poll cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSnapshot {
    pub id: MarketId,
    pub title: String,
    pub created_at: Option<DateTime<Utc>>,
    pub yes_price: f64,
    pub no_price: f64,
    #[serde(rename = "volume24h")]
    pub volume_24h: f64,
    pub liquidity: f64,
}

impl MarketSnapshot {
    /// Normalize a raw market.
    ///
    /// Returns `None` when the market has no resolvable "Yes"/"No" price pair,
    /// which is the expected case for non-binary markets.
    #[must_use]
    pub fn from_raw(raw: &RawMarket) -> Option<Self> {
        let yes_price = raw.outcome_price(YES)?;
        let no_price = raw.outcome_price(NO)?;

        let title = raw
            .question
            .as_deref()
            .filter(|q| !q.is_empty())
            .or_else(|| raw.title.as_deref().filter(|t| !t.is_empty()))
            .unwrap_or(UNTITLED)
            .to_string();

        Some(Self {
            id: MarketId::new(raw.id.clone()),
            title,
            created_at: raw.created_at.as_deref().and_then(parse_timestamp),
            yes_price,
            no_price,
            volume_24h: parse_amount(raw.volume_24h.as_deref()),
            liquidity: parse_amount(raw.liquidity.as_deref()),
        })
    }
}

/// Parse a price, rejecting anything that is not a finite number.
#[must_use]
pub fn parse_price(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|price| price.is_finite())
}

/// Parse a non-negative amount, defaulting to zero when absent or invalid.
#[must_use]
pub fn parse_amount(value: Option<&str>) -> f64 {
    value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|amount| amount.is_finite() && *amount >= 0.0)
        .unwrap_or(0.0)
}

/// Parse an upstream creation timestamp (RFC 3339, or a bare date).
#[must_use]
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
