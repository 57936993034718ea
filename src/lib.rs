//! Edgewatch - Prediction market edge scanner.
//!
//! Polls active Polymarket markets, scores each one for anomalous pricing,
//! liquidity and volume patterns ("edges"), pushes the ranked results to live
//! WebSocket subscribers and mirrors the top of the list into a Google Sheet.
//!
//! # Architecture
//!
//! ```text
//!   Gamma API ─▶ PollOrchestrator ─▶ EdgeCache ─┬─▶ Publisher ─▶ /ws subscribers
//!                     │                          ├─▶ REST API
//!                  detect()                      └─▶ SyncEngine ─▶ Google Sheets
//! ```
//!
//! # Modules
//!
//! - [`domain`] - Market snapshots, scoring and edge detection (pure)
//! - [`port`] - Traits at the system boundary: market source, edge sink, clock
//! - [`application`] - Poll orchestration, cache, fan-out and the sync engine
//! - [`adapter`] - Gamma client, Google Sheets sink, HTTP/WebSocket server
//! - [`infrastructure`] - Configuration, bootstrap and runtime lifecycle
//! - [`cli`] - Command-line interface
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```
//! use chrono::Utc;
//! use edgewatch::domain::{detect, RawMarket, RawOutcome};
//!
//! let market = RawMarket {
//!     id: "m1".into(),
//!     question: Some("Will it rain?".into()),
//!     outcomes: vec![RawOutcome::new("Yes", "0.97"), RawOutcome::new("No", "0.03")],
//!     ..Default::default()
//! };
//! let edges = detect(&[market], Utc::now());
//! assert_eq!(edges[0].edge_score, 15.0);
//! ```

pub mod adapter;
pub mod application;
pub mod cli;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
