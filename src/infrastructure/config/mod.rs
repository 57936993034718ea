//! Infrastructure configuration modules.

pub mod logging;
pub mod server;
pub mod settings;
pub mod sheets;

pub use logging::LoggingConfig;
pub use server::ServerConfig;
pub use settings::{Config, PollConfig, SourceConfig, SyncConfig};
pub use sheets::SheetsAppConfig;
