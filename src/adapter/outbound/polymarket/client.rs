//! Gamma API client.
//!
//! Fetches active markets from `gamma-api.polymarket.com` and hands them to
//! the domain as [`RawMarket`]s. Retries are not attempted here: the poll
//! interval is the retry.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use tracing::{debug, warn};

use serde_json::Value;

use super::dto::{decode_page, GammaMarket};
use crate::domain::RawMarket;
use crate::error::{Error, Result};
use crate::port::MarketSource;

/// Production Gamma API base URL.
pub const DEFAULT_GAMMA_URL: &str = "https://gamma-api.polymarket.com";

/// Markets requested per poll.
pub const DEFAULT_MARKET_LIMIT: usize = 100;

/// HTTP client for the Gamma market listing.
pub struct GammaClient {
    http: HttpClient,
    base_url: String,
    limit: usize,
}

impl GammaClient {
    #[must_use]
    pub fn new(base_url: impl Into<String>, limit: usize, timeout: Duration) -> Self {
        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            limit,
        }
    }

    /// URL of the market listing.
    #[must_use]
    pub fn markets_url(&self) -> String {
        format!(
            "{}/markets?limit={}&active=true",
            self.base_url, self.limit
        )
    }

    /// Fetch one page of active markets in Gamma's own shape.
    ///
    /// Records that fail to decode are skipped; only a body that is not a
    /// JSON array fails the fetch.
    pub async fn get_markets(&self) -> Result<Vec<GammaMarket>> {
        let url = self.markets_url();
        debug!(url = %url, "Fetching active markets (Gamma)");

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Upstream(format!("GET {url} returned {status}: {body}")));
        }

        let records: Vec<Value> = response.json().await?;
        let received = records.len();
        let markets = decode_page(records);
        if markets.len() < received {
            warn!(
                received,
                skipped = received - markets.len(),
                "Skipped malformed Gamma market records"
            );
        }
        debug!(count = markets.len(), "Fetched markets from Gamma");
        Ok(markets)
    }
}

#[async_trait]
impl MarketSource for GammaClient {
    async fn fetch_markets(&self) -> Result<Vec<RawMarket>> {
        let markets = self.get_markets().await?;
        Ok(markets.into_iter().map(RawMarket::from).collect())
    }

    fn source_name(&self) -> &'static str {
        "gamma"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markets_url_carries_limit_and_active_filter() {
        let client = GammaClient::new(DEFAULT_GAMMA_URL, 100, Duration::from_secs(10));
        assert_eq!(
            client.markets_url(),
            "https://gamma-api.polymarket.com/markets?limit=100&active=true"
        );
    }

    #[test]
    fn trailing_slash_is_ignored() {
        let client = GammaClient::new("http://localhost:9000/", 5, Duration::from_secs(1));
        assert_eq!(
            client.markets_url(),
            "http://localhost:9000/markets?limit=5&active=true"
        );
        assert_eq!(client.source_name(), "gamma");
    }
}
