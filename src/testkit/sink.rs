//! Recording edge sink with failure injection.

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::SinkError;
use crate::port::{EdgeSink, SheetRow};

#[derive(Default)]
struct State {
    connect_calls: u32,
    write_calls: u32,
    rows: Vec<SheetRow>,
    writes: Vec<Vec<SheetRow>>,
    connect_failure: Option<String>,
    write_failures: VecDeque<SinkError>,
}

/// An [`EdgeSink`] that keeps everything written to it in memory.
///
/// Like a real sheet, each successful overwrite replaces the stored rows.
#[derive(Default)]
pub struct RecordingSink {
    state: Mutex<State>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every connect attempt fail with `message`.
    pub fn fail_connect(&self, message: &str) {
        self.state.lock().connect_failure = Some(message.to_string());
    }

    /// Let connect attempts succeed again.
    pub fn allow_connect(&self) {
        self.state.lock().connect_failure = None;
    }

    /// Fail the next write with `error`. Queued failures are consumed in order.
    pub fn fail_next_write(&self, error: SinkError) {
        self.state.lock().write_failures.push_back(error);
    }

    /// Fail the next `times` writes with a rate-limit error.
    pub fn rate_limit_next(&self, times: usize) {
        let mut state = self.state.lock();
        for _ in 0..times {
            state
                .write_failures
                .push_back(SinkError::Write("HTTP 429 rate limited".into()));
        }
    }

    pub fn connect_calls(&self) -> u32 {
        self.state.lock().connect_calls
    }

    /// Write attempts, failed ones included.
    pub fn write_calls(&self) -> u32 {
        self.state.lock().write_calls
    }

    /// Rows currently held.
    pub fn rows(&self) -> Vec<SheetRow> {
        self.state.lock().rows.clone()
    }

    /// Every successful write, oldest first.
    pub fn writes(&self) -> Vec<Vec<SheetRow>> {
        self.state.lock().writes.clone()
    }
}

#[async_trait]
impl EdgeSink for RecordingSink {
    async fn connect(&self) -> Result<(), SinkError> {
        let mut state = self.state.lock();
        state.connect_calls += 1;
        match &state.connect_failure {
            Some(message) => Err(SinkError::Connect(message.clone())),
            None => Ok(()),
        }
    }

    async fn overwrite(&self, rows: &[SheetRow]) -> Result<(), SinkError> {
        let mut state = self.state.lock();
        state.write_calls += 1;
        if let Some(error) = state.write_failures.pop_front() {
            return Err(error);
        }
        state.rows = rows.to_vec();
        state.writes.push(rows.to_vec());
        Ok(())
    }

    async fn recent_rows(&self, limit: usize) -> Result<Vec<SheetRow>, SinkError> {
        let state = self.state.lock();
        let skip = state.rows.len().saturating_sub(limit);
        Ok(state.rows[skip..].to_vec())
    }

    fn sink_name(&self) -> &'static str {
        "recording"
    }
}
