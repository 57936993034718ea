//! Builders for domain values used across tests.

use chrono::{DateTime, TimeZone, Utc};

use crate::domain::{EdgeResult, EdgeTag, MarketId, MarketSnapshot, RawMarket, RawOutcome};

/// A binary raw market with textual Yes/No prices.
pub fn raw_market(id: &str, yes: &str, no: &str) -> RawMarket {
    RawMarket {
        id: id.to_string(),
        question: Some(format!("Question {id}?")),
        outcomes: vec![RawOutcome::new("Yes", yes), RawOutcome::new("No", no)],
        ..Default::default()
    }
}

/// A raw market with volume and liquidity.
pub fn raw_market_with_flow(id: &str, yes: &str, no: &str, volume: &str, liquidity: &str) -> RawMarket {
    RawMarket {
        volume_24h: Some(volume.to_string()),
        liquidity: Some(liquidity.to_string()),
        ..raw_market(id, yes, no)
    }
}

/// A normalized snapshot with `no = 1 - yes` and no flow.
pub fn snapshot(id: &str, yes: f64) -> MarketSnapshot {
    MarketSnapshot {
        id: MarketId::from(id),
        title: format!("Question {id}?"),
        created_at: None,
        yes_price: yes,
        no_price: 1.0 - yes,
        volume_24h: 0.0,
        liquidity: 0.0,
    }
}

/// An edge result tagged extreme, detected at [`detected_at`].
pub fn edge(id: &str, yes: f64, score: f64) -> EdgeResult {
    EdgeResult {
        market: snapshot(id, yes),
        edge_score: score,
        tags: [EdgeTag::Extreme].into_iter().collect(),
        detected_at: detected_at(),
    }
}

/// Fixed detection timestamp used by [`edge`].
pub fn detected_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
}
