//! Spreadsheet sync pipeline.
//!
//! - [`SyncEngine`] - Delta tracking, backoff and full-overwrite writes
//! - [`PriceHistory`] - Last synced price per market
//! - [`RateLimitState`] - Adaptive pre-write delay
//! - [`SyncStatus`] - Outcome reporting for health checks

mod engine;
mod history;
mod rate_limit;
mod row;
mod status;

pub use engine::{
    SyncEngine, SyncOutcome, SyncSettings, DEFAULT_MARKET_URL_BASE, DEFAULT_MAX_ROWS,
};
pub use history::PriceHistory;
pub use rate_limit::{BackoffPolicy, RateLimitState};
pub use row::{build_row, format_price_change, market_url};
pub use status::{SyncReport, SyncStatus};
