//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Every section is optional in the TOML file. A few values can be overridden
//! from the environment:
//!
//! | Variable               | Overrides              |
//! |------------------------|------------------------|
//! | `PORT`                 | `server.port`          |
//! | `POLL_INTERVAL`        | `poll.interval_ms`     |
//! | `SHEETS_SYNC_INTERVAL` | `sync.interval_ms`     |
//!
//! # Example
//!
//! ```no_run
//! use edgewatch::infrastructure::config::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use super::logging::LoggingConfig;
use super::server::ServerConfig;
use super::sheets::SheetsAppConfig;
use crate::adapter::outbound::polymarket::{DEFAULT_GAMMA_URL, DEFAULT_MARKET_LIMIT};
use crate::application::sync::{
    BackoffPolicy, SyncSettings, DEFAULT_MARKET_URL_BASE, DEFAULT_MAX_ROWS,
};
use crate::error::{ConfigError, Result};

pub const ENV_PORT: &str = "PORT";
pub const ENV_POLL_INTERVAL: &str = "POLL_INTERVAL";
pub const ENV_SYNC_INTERVAL: &str = "SHEETS_SYNC_INTERVAL";

/// Upstream market source settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub api_url: String,
    /// Markets requested per poll.
    pub limit: usize,
    pub request_timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_GAMMA_URL.into(),
            limit: DEFAULT_MARKET_LIMIT,
            request_timeout_secs: 10,
        }
    }
}

impl SourceConfig {
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    pub interval_ms: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self { interval_ms: 10_000 }
    }
}

impl PollConfig {
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Sheet sync settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Disable to run without touching the spreadsheet even when credentials
    /// are present.
    pub enabled: bool,
    pub interval_ms: u64,
    pub max_rows: usize,
    pub backoff_step_ms: u64,
    pub max_delay_ms: u64,
    pub decay_ms: u64,
    pub market_url_base: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        let backoff = BackoffPolicy::default();
        Self {
            enabled: true,
            interval_ms: 3_600_000,
            max_rows: DEFAULT_MAX_ROWS,
            backoff_step_ms: backoff.step_ms,
            max_delay_ms: backoff.max_delay_ms,
            decay_ms: backoff.decay_ms,
            market_url_base: DEFAULT_MARKET_URL_BASE.into(),
        }
    }
}

impl SyncConfig {
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    #[must_use]
    pub fn settings(&self) -> SyncSettings {
        SyncSettings {
            max_rows: self.max_rows,
            backoff: BackoffPolicy {
                step_ms: self.backoff_step_ms,
                max_delay_ms: self.max_delay_ms,
                decay_ms: self.decay_ms,
            },
            market_url_base: self.market_url_base.clone(),
        }
    }
}

/// Main application configuration.
///
/// Load from a TOML file using [`Config::load`] or parse directly with
/// [`Config::parse_toml`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Market source (Gamma API).
    #[serde(default)]
    pub source: SourceConfig,

    /// Poll cadence.
    #[serde(default)]
    pub poll: PollConfig,

    /// Sheet sync cadence, row cap and backoff tuning.
    #[serde(default)]
    pub sync: SyncConfig,

    /// Spreadsheet target. Credentials are read from the environment.
    #[serde(default)]
    pub sheets: SheetsAppConfig,

    /// API and WebSocket bind address.
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn parse_env<T: FromStr>(
    env: &dyn Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match env(key).filter(|v| !v.trim().is_empty()) {
        None => Ok(None),
        Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|e| {
            ConfigError::InvalidValue {
                field: key,
                reason: format!("{raw:?}: {e}"),
            }
            .into()
        }),
    }
}

impl Config {
    /// Parse configuration from TOML content, applying process environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed, an override is not
    /// a number, or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        Self::parse_toml_with_env(content, &|key| std::env::var(key).ok())
    }

    /// Parse configuration from TOML content with an explicit environment.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml_with_env(
        content: &str,
        env: &dyn Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.apply_env(env)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Load from `path` if it exists, otherwise start from defaults.
    #[allow(clippy::result_large_err)]
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Self::parse_toml("")
        }
    }

    /// Initialize logging based on configuration.
    pub fn init_logging(&self) {
        self.logging.init();
    }

    #[allow(clippy::result_large_err)]
    fn apply_env(&mut self, env: &dyn Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(port) = parse_env::<u16>(env, ENV_PORT)? {
            self.server.port = port;
        }
        if let Some(interval) = parse_env::<u64>(env, ENV_POLL_INTERVAL)? {
            self.poll.interval_ms = interval;
        }
        if let Some(interval) = parse_env::<u64>(env, ENV_SYNC_INTERVAL)? {
            self.sync.interval_ms = interval;
        }
        self.sheets.apply_env(env);
        Ok(())
    }

    /// Validate configuration values.
    #[allow(clippy::result_large_err)]
    fn validate(&self) -> Result<()> {
        if self.source.api_url.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "api_url" }.into());
        }
        url::Url::parse(&self.source.api_url).map_err(|e| ConfigError::InvalidValue {
            field: "api_url",
            reason: e.to_string(),
        })?;
        if self.source.limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "limit",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.source.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.poll.interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "poll.interval_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.sync.interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "sync.interval_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.sync.max_rows == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_rows",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.sync.max_delay_ms < self.sync.backoff_step_ms {
            return Err(ConfigError::InvalidValue {
                field: "max_delay_ms",
                reason: "must be >= backoff_step_ms".to_string(),
            }
            .into());
        }
        if self.sheets.worksheet_title.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "worksheet_title",
            }
            .into());
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::InvalidValue {
                field: "logging.format",
                reason: "must be \"pretty\" or \"json\"".to_string(),
            }
            .into());
        }
        Ok(())
    }
}
