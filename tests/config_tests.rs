//! Loading configuration from disk.

mod support;

use edgewatch::error::{ConfigError, Error};
use edgewatch::infrastructure::config::Config;
use support::config::temp_config;

#[test]
fn loads_file_and_fills_defaults() {
    let file = temp_config(
        r#"
[source]
limit = 50

[sync]
max_rows = 25
backoff_step_ms = 2000

[sheets]
worksheet_title = "Edges"

[logging]
format = "json"
"#,
    );

    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.source.limit, 50);
    assert_eq!(config.source.api_url, "https://gamma-api.polymarket.com");
    assert_eq!(config.sync.max_rows, 25);
    assert_eq!(config.sync.settings().backoff.step_ms, 2_000);
    assert_eq!(config.sync.settings().backoff.max_delay_ms, 20_000);
    assert_eq!(config.sheets.worksheet_title, "Edges");
    assert!(config.logging.is_json());
}

#[test]
fn missing_file_is_a_read_error() {
    let err = Config::load("/nonexistent/edgewatch.toml").unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::ReadFile(_))));
}

#[test]
fn load_or_default_tolerates_missing_file() {
    let config = Config::load_or_default("/nonexistent/edgewatch.toml").unwrap();
    assert_eq!(config.source.limit, 100);
    assert_eq!(config.sync.max_rows, 100);
}

#[test]
fn load_or_default_still_validates_existing_file() {
    let file = temp_config("[source]\nlimit = 0\n");
    let err = Config::load_or_default(file.path()).unwrap_err();
    assert!(matches!(
        err,
        Error::Config(ConfigError::InvalidValue { field: "limit", .. })
    ));
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let file = temp_config("[source\nlimit = ");
    let err = Config::load(file.path()).unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::Parse(_))));
}

#[test]
fn env_overrides_apply_on_top_of_file_values() {
    let env = |key: &str| match key {
        "POLL_INTERVAL" => Some("2500".to_string()),
        "GOOGLE_SHEET_ID" => Some("sheet-123".to_string()),
        _ => None,
    };
    let config = Config::parse_toml_with_env("[poll]\ninterval_ms = 60000\n", &env).unwrap();
    assert_eq!(config.poll.interval_ms, 2_500);
    assert_eq!(config.sheets.spreadsheet_id.as_deref(), Some("sheet-123"));
}
