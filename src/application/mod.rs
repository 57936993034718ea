//! Application services (use cases).
//!
//! These services orchestrate domain logic and coordinate adapters
//! to implement the application's use cases.

pub mod cache;
pub mod fanout;
pub mod poll;
pub mod sync;

pub use cache::{EdgeCache, PollSnapshot};
pub use fanout::{Publisher, Subscription};
pub use poll::{PollError, PollOrchestrator, PollState};
pub use sync::{SyncEngine, SyncOutcome, SyncSettings, SyncStatus};
