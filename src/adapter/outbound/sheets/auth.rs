//! Service-account authentication.
//!
//! A self-signed RS256 JWT is exchanged at Google's token endpoint for a
//! short-lived bearer token, which is cached until shortly before expiry.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

/// OAuth scope for read/write spreadsheet access.
pub const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
const REFRESH_MARGIN_SECS: i64 = 60;

/// Service-account credentials.
#[derive(Clone)]
pub struct ServiceAccount {
    pub client_email: String,
    /// PEM-encoded RSA private key.
    pub private_key: String,
}

impl ServiceAccount {
    /// Create credentials, turning literal `\n` sequences in the key into
    /// newlines as they appear when a PEM is stored in a single-line env var.
    #[must_use]
    pub fn new(client_email: impl Into<String>, private_key: impl AsRef<str>) -> Self {
        Self {
            client_email: client_email.into(),
            private_key: private_key.as_ref().replace("\\n", "\n"),
        }
    }
}

impl fmt::Debug for ServiceAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccount")
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

impl<'a> Claims<'a> {
    pub(crate) fn new(account: &'a ServiceAccount, now: DateTime<Utc>) -> Self {
        let iat = now.timestamp();
        Self {
            iss: &account.client_email,
            scope: SHEETS_SCOPE,
            aud: TOKEN_URL,
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        }
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

const fn default_expires_in() -> i64 {
    ASSERTION_LIFETIME_SECS
}

struct CachedToken {
    value: String,
    refresh_at: DateTime<Utc>,
}

/// Issues bearer tokens for a service account.
pub struct TokenSource {
    http: HttpClient,
    account: ServiceAccount,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenSource {
    #[must_use]
    pub fn new(http: HttpClient, account: ServiceAccount) -> Self {
        Self {
            http,
            account,
            cached: Mutex::new(None),
        }
    }

    /// Sign the JWT assertion sent to the token endpoint.
    pub fn assertion(&self, now: DateTime<Utc>) -> Result<String, String> {
        let key = EncodingKey::from_rsa_pem(self.account.private_key.as_bytes())
            .map_err(|e| format!("invalid service account key: {e}"))?;
        encode(
            &Header::new(Algorithm::RS256),
            &Claims::new(&self.account, now),
            &key,
        )
        .map_err(|e| format!("failed to sign token assertion: {e}"))
    }

    /// Current bearer token, refreshed if missing or about to expire.
    pub async fn token(&self) -> Result<String, String> {
        let mut cached = self.cached.lock().await;
        let now = Utc::now();
        if let Some(token) = cached.as_ref().filter(|t| t.refresh_at > now) {
            return Ok(token.value.clone());
        }

        let assertion = self.assertion(now)?;
        let response = self
            .http
            .post(TOKEN_URL)
            .form(&[("grant_type", GRANT_TYPE), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| format!("token request failed: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(format!("token exchange returned HTTP {status}: {body}"));
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| format!("invalid token response: {e}"))?;

        let lifetime = (body.expires_in - REFRESH_MARGIN_SECS).max(0);
        debug!(
            client_email = %self.account.client_email,
            expires_in = body.expires_in,
            "Obtained access token"
        );
        *cached = Some(CachedToken {
            value: body.access_token.clone(),
            refresh_at: now + Duration::seconds(lifetime),
        });
        Ok(body.access_token)
    }
}

#[cfg(test)]
impl TokenSource {
    /// A source that already holds `value`, valid for an hour.
    pub(crate) fn preloaded(http: HttpClient, account: ServiceAccount, value: &str) -> Self {
        Self {
            http,
            account,
            cached: Mutex::new(Some(CachedToken {
                value: value.to_string(),
                refresh_at: Utc::now() + Duration::hours(1),
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn escaped_newlines_are_restored() {
        let account = ServiceAccount::new("svc@example.iam", "-----BEGIN-----\\nabc\\n-----END-----");
        assert_eq!(account.private_key, "-----BEGIN-----\nabc\n-----END-----");
    }

    #[test]
    fn debug_redacts_key() {
        let account = ServiceAccount::new("svc@example.iam", "secret");
        let rendered = format!("{account:?}");
        assert!(rendered.contains("svc@example.iam"));
        assert!(!rendered.contains("secret"));
    }

    #[test]
    fn claims_cover_one_hour() {
        let account = ServiceAccount::new("svc@example.iam", "k");
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let claims = Claims::new(&account, now);
        assert_eq!(claims.iss, "svc@example.iam");
        assert_eq!(claims.scope, SHEETS_SCOPE);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn malformed_key_is_reported() {
        let source = TokenSource::new(HttpClient::new(), ServiceAccount::new("svc", "not a pem"));
        let err = source.assertion(Utc::now()).unwrap_err();
        assert!(err.contains("invalid service account key"));
    }
}
