//! Inbound adapters (driving side).

pub mod server;
