//! Polymarket Gamma API adapter.

mod client;
mod dto;

pub use client::{GammaClient, DEFAULT_GAMMA_URL, DEFAULT_MARKET_LIMIT};
pub use dto::GammaMarket;
