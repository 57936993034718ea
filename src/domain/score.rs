//! Edge scoring heuristic.
//!
//! Five independent signals each add a fixed (or, for mispricing,
//! proportional) number of points. A market may trigger any subset.
//!
//! | Signal | Points | Tag |
//! |---|---|---|
//! | `|1 - (yes + no)| > 0.02` | `deviation * 100` | `MISPRICING` |
//! | `yes > 0.95` or `yes < 0.05` | 15 | `EXTREME` |
//! | volume > 50k, liquidity > 10k, turnover > 5x | 20 | `VOLUME_ANOMALY` |
//! | liquidity < 5k and volume > 10k | 25 | `CATALYST` |
//! | created less than 48h ago | 10 | `NEW_MARKET` |
//!
//! Tags are emitted in the order MISPRICING, EXTREME, CATALYST,
//! VOLUME_ANOMALY, NEW_MARKET, which differs from the order points are
//! accumulated in.
//!
//! The VOLUME_ANOMALY tag is emitted on the turnover ratio and liquidity
//! floor alone, without the 50k volume floor that gates its points. With a
//! liquidity floor of 10k and a turnover above 5x the volume floor is implied,
//! so tag and points currently agree; they would drift apart if the
//! thresholds were changed independently.

use chrono::{DateTime, Duration, Utc};

use super::edge::{EdgeTag, EdgeTags};
use super::market::MarketSnapshot;

const MISPRICING_THRESHOLD: f64 = 0.02;
const EXTREME_HIGH: f64 = 0.95;
const EXTREME_LOW: f64 = 0.05;
const ANOMALY_MIN_VOLUME: f64 = 50_000.0;
const ANOMALY_MIN_LIQUIDITY: f64 = 10_000.0;
const ANOMALY_MIN_TURNOVER: f64 = 5.0;
const CATALYST_MAX_LIQUIDITY: f64 = 5_000.0;
const CATALYST_MIN_VOLUME: f64 = 10_000.0;
const NEW_MARKET_HOURS: i64 = 48;

const EXTREME_POINTS: f64 = 15.0;
const VOLUME_ANOMALY_POINTS: f64 = 20.0;
const CATALYST_POINTS: f64 = 25.0;
const NEW_MARKET_POINTS: f64 = 10.0;

/// Score and tags for one market.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeScore {
    pub score: f64,
    pub tags: EdgeTags,
}

/// Score a snapshot as of `now`.
#[must_use]
pub fn score(market: &MarketSnapshot, now: DateTime<Utc>) -> EdgeScore {
    let mut points = 0.0;
    let mispricing = pricing_error(market);
    let extreme = is_extreme(market);
    let catalyst = is_catalyst(market);
    let new_market = is_new(market, now);

    if let Some(error) = mispricing {
        points += error * 100.0;
    }
    if extreme {
        points += EXTREME_POINTS;
    }
    if market.volume_24h > ANOMALY_MIN_VOLUME && has_high_turnover(market) {
        points += VOLUME_ANOMALY_POINTS;
    }
    if catalyst {
        points += CATALYST_POINTS;
    }
    if new_market {
        points += NEW_MARKET_POINTS;
    }

    let mut tags = EdgeTags::new();
    if mispricing.is_some() {
        tags.push(EdgeTag::Mispricing);
    }
    if extreme {
        tags.push(EdgeTag::Extreme);
    }
    if catalyst {
        tags.push(EdgeTag::Catalyst);
    }
    if has_high_turnover(market) {
        tags.push(EdgeTag::VolumeAnomaly);
    }
    if new_market {
        tags.push(EdgeTag::NewMarket);
    }

    EdgeScore {
        score: points,
        tags,
    }
}

fn pricing_error(market: &MarketSnapshot) -> Option<f64> {
    let error = (1.0 - (market.yes_price + market.no_price)).abs();
    (error > MISPRICING_THRESHOLD).then_some(error)
}

fn is_extreme(market: &MarketSnapshot) -> bool {
    market.yes_price > EXTREME_HIGH || market.yes_price < EXTREME_LOW
}

// Liquidity above the floor also rules out a zero divisor.
fn has_high_turnover(market: &MarketSnapshot) -> bool {
    market.liquidity > ANOMALY_MIN_LIQUIDITY
        && market.volume_24h / market.liquidity > ANOMALY_MIN_TURNOVER
}

fn is_catalyst(market: &MarketSnapshot) -> bool {
    market.liquidity < CATALYST_MAX_LIQUIDITY && market.volume_24h > CATALYST_MIN_VOLUME
}

fn is_new(market: &MarketSnapshot, now: DateTime<Utc>) -> bool {
    market
        .created_at
        .is_some_and(|created| now - created < Duration::hours(NEW_MARKET_HOURS))
}
