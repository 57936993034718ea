//! Implementations of ports (hexagonal adapters).
//!
//! - `inbound` - Driving side: the HTTP/WebSocket API
//! - `outbound` - Driven side: market source and spreadsheet sink

pub mod inbound;
pub mod outbound;
