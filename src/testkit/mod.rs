//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`source`] - Scripted [`MarketSource`](crate::port::MarketSource)
//! - [`sink`] - Recording [`EdgeSink`](crate::port::EdgeSink) with failure injection
//! - [`clock`] - Settable [`Clock`](crate::port::Clock)
//! - [`domain`] - Builders for raw markets, snapshots and edge results

pub mod clock;
pub mod domain;
pub mod sink;
pub mod source;

pub use clock::FixedClock;
pub use sink::RecordingSink;
pub use source::ScriptedSource;
