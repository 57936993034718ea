//! Outbound adapters (driven side).

pub mod polymarket;
pub mod sheets;
