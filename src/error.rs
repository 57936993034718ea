use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Phrases that mark a write failure as a rate limit or quota rejection.
const RATE_LIMIT_MARKERS: [&str; 6] = [
    "rate limit",
    "ratelimit",
    "rate-limit",
    "rate_limit",
    "too many requests",
    "quota",
];

/// Errors reported by an edge sink.
///
/// Rate limiting is not a separate variant: sinks surface it as a write
/// failure and [`SinkError::is_rate_limited`] classifies it by message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    #[error("sink connect failed: {0}")]
    Connect(String),

    #[error("sink write failed: {0}")]
    Write(String),
}

impl SinkError {
    /// True when this is a write failure whose message looks like a rate limit
    /// or quota rejection.
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        match self {
            Self::Write(message) => {
                let message = message.to_ascii_lowercase();
                RATE_LIMIT_MARKERS
                    .iter()
                    .any(|marker| message.contains(marker))
            }
            Self::Connect(_) => false,
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Sink(#[from] SinkError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("upstream error: {0}")]
    Upstream(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_detected_from_write_message() {
        assert!(SinkError::Write("Quota exceeded for quota metric".into()).is_rate_limited());
        assert!(SinkError::Write("HTTP 429: rate limited".into()).is_rate_limited());
        assert!(SinkError::Write("RATE LIMIT".into()).is_rate_limited());
        assert!(SinkError::Write("write rows: HTTP 429 Too Many Requests: {}".into()).is_rate_limited());
        assert!(SinkError::Write("RESOURCE_EXHAUSTED: rateLimitExceeded".into()).is_rate_limited());
    }

    #[test]
    fn words_containing_rate_are_not_rate_limits() {
        for message in [
            "failed to generate request body",
            "separate sheet missing",
            "inaccurate range: A2:K",
            "migrate the spreadsheet first",
        ] {
            assert!(
                !SinkError::Write(message.into()).is_rate_limited(),
                "{message} classified as rate limited"
            );
        }
    }

    #[test]
    fn other_failures_are_not_rate_limits() {
        assert!(!SinkError::Write("HTTP 500: backend error".into()).is_rate_limited());
        assert!(!SinkError::Connect("quota exceeded".into()).is_rate_limited());
    }

    #[test]
    fn sink_error_converts_into_crate_error() {
        let err: Error = SinkError::Connect("no route".into()).into();
        assert_eq!(err.to_string(), "sink connect failed: no route");
    }
}
