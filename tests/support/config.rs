use std::io::Write;

use tempfile::NamedTempFile;

/// Write `contents` to a temporary `.toml` file that lives as long as the
/// returned handle.
pub fn temp_config(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("edgewatch-config-")
        .suffix(".toml")
        .tempfile()
        .expect("create temp config");
    file.write_all(contents.as_bytes())
        .expect("write temp config");
    file
}

/// A config whose source points at a closed local port, so any fetch fails
/// fast without touching the network.
pub const UNREACHABLE_SOURCE: &str = r#"
[source]
api_url = "http://127.0.0.1:9"
request_timeout_secs = 2

[sync]
enabled = false
"#;
