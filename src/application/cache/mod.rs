//! Runtime caches used by application services.
//!
//! - [`edge::EdgeCache`]: The latest poll cycle's markets and ranked edges

pub mod edge;

pub use edge::{EdgeCache, PollSnapshot};
