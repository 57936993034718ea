//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports define the extension points the core calls through. Adapters
//! implement them to integrate with external systems.
//!
//! ```text
//!   ┌─────────────┐      ┌───────────────────┐      ┌────────────┐
//!   │ MarketSource│ ───▶ │ poll ▸ cache ▸ sync│ ───▶ │  EdgeSink  │
//!   └─────────────┘      └───────────────────┘      └────────────┘
//!                                 ▲
//!                               Clock
//! ```
//!
//! # Available Ports
//!
//! - [`MarketSource`] - Upstream market data
//! - [`EdgeSink`] - Durable mirror of the latest edges
//! - [`Clock`] - Wall-clock time

pub mod outbound;

pub use outbound::clock::{Clock, SystemClock};
pub use outbound::exchange::MarketSource;
pub use outbound::sink::{EdgeSink, SheetRow, SHEET_HEADERS};
