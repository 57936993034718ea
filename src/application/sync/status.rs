//! Observable sync status for health reporting.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;

use super::engine::SyncOutcome;

/// Point-in-time view of the sync task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub enabled: bool,
    pub last_success: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub rows_written: usize,
    pub current_delay_ms: u64,
}

/// Shared, read-mostly sync status.
///
/// Written only by the sync task after each cycle.
#[derive(Debug, Default)]
pub struct SyncStatus {
    report: RwLock<SyncReport>,
}

impl SyncStatus {
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self {
            report: RwLock::new(SyncReport {
                enabled,
                ..SyncReport::default()
            }),
        }
    }

    /// Record the outcome of a sync cycle.
    pub fn record(&self, outcome: &SyncOutcome, at: DateTime<Utc>, current_delay_ms: u64) {
        let mut report = self.report.write();
        report.current_delay_ms = current_delay_ms;
        match outcome {
            SyncOutcome::Synced { rows_written } => {
                report.last_success = Some(at);
                report.last_error = None;
                report.rows_written = *rows_written;
            }
            SyncOutcome::Failed(e) => {
                report.last_error = Some(e.to_string());
            }
        }
    }

    #[must_use]
    pub fn report(&self) -> SyncReport {
        self.report.read().clone()
    }
}
