//! Exchange-agnostic domain logic: market snapshots, edge scoring and detection.

pub mod detector;
pub mod edge;
pub mod id;
pub mod market;
pub mod score;

pub use detector::{detect, detect_snapshots, normalize};
pub use edge::{EdgeResult, EdgeTag, EdgeTags, UNKNOWN_EDGE};
pub use id::MarketId;
pub use market::{MarketSnapshot, RawMarket, RawOutcome};
pub use score::{score, EdgeScore};
