//! Google Sheets configuration.
//!
//! Only the spreadsheet and worksheet names live in the config file. The
//! service-account credentials come from the environment:
//! `GOOGLE_SERVICE_ACCOUNT_EMAIL`, `GOOGLE_PRIVATE_KEY` and `GOOGLE_SHEET_ID`
//! (the last overriding `spreadsheet_id`).

use serde::Deserialize;

use crate::adapter::outbound::sheets::{ServiceAccount, SheetsConfig, DEFAULT_WORKSHEET_TITLE};

pub const ENV_CLIENT_EMAIL: &str = "GOOGLE_SERVICE_ACCOUNT_EMAIL";
pub const ENV_PRIVATE_KEY: &str = "GOOGLE_PRIVATE_KEY";
pub const ENV_SHEET_ID: &str = "GOOGLE_SHEET_ID";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SheetsAppConfig {
    pub spreadsheet_id: Option<String>,
    pub worksheet_title: String,
    /// Service account email (from `GOOGLE_SERVICE_ACCOUNT_EMAIL`).
    #[serde(skip)]
    pub client_email: Option<String>,
    /// Service account PEM key (from `GOOGLE_PRIVATE_KEY`).
    #[serde(skip)]
    pub private_key: Option<String>,
}

impl Default for SheetsAppConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: None,
            worksheet_title: DEFAULT_WORKSHEET_TITLE.into(),
            client_email: None,
            private_key: None,
        }
    }
}

impl SheetsAppConfig {
    pub(crate) fn apply_env(&mut self, env: &dyn Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| env(key).filter(|v| !v.trim().is_empty());
        if let Some(id) = non_empty(ENV_SHEET_ID) {
            self.spreadsheet_id = Some(id);
        }
        self.client_email = non_empty(ENV_CLIENT_EMAIL);
        self.private_key = non_empty(ENV_PRIVATE_KEY);
    }

    /// Names of the credential variables that are still unset.
    #[must_use]
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.client_email.is_none() {
            missing.push(ENV_CLIENT_EMAIL);
        }
        if self.private_key.is_none() {
            missing.push(ENV_PRIVATE_KEY);
        }
        if self.spreadsheet_id.is_none() {
            missing.push(ENV_SHEET_ID);
        }
        missing
    }

    /// Adapter settings, when every credential is present.
    #[must_use]
    pub fn sink_config(&self) -> Option<SheetsConfig> {
        Some(SheetsConfig {
            spreadsheet_id: self.spreadsheet_id.clone()?,
            worksheet_title: self.worksheet_title.clone(),
            account: ServiceAccount::new(self.client_email.clone()?, self.private_key.as_deref()?),
        })
    }
}
