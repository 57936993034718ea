//! Market source port.

use async_trait::async_trait;

use crate::domain::RawMarket;
use crate::error::Error;

/// Fetches raw market records from an upstream exchange.
///
/// Implementations are expected to bound each request with a timeout; a
/// timeout is reported as an ordinary error.
#[async_trait]
pub trait MarketSource: Send + Sync {
    /// Fetch the current set of active markets.
    async fn fetch_markets(&self) -> Result<Vec<RawMarket>, Error>;

    /// Get the source name for logging/debugging.
    fn source_name(&self) -> &'static str;
}
