//! Google Sheets adapter.
//!
//! - [`ServiceAccount`] - Service-account credentials and OAuth token exchange
//! - [`SheetsSink`] - [`EdgeSink`](crate::port::EdgeSink) over the Sheets v4 REST API

mod auth;
mod client;
mod request;

pub use auth::{ServiceAccount, TokenSource, SHEETS_SCOPE};
pub use client::{SheetsConfig, SheetsSink, DEFAULT_WORKSHEET_TITLE};
