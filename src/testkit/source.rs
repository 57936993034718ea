//! Scripted market source.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::RawMarket;
use crate::error::{Error, Result};
use crate::port::MarketSource;

/// A [`MarketSource`] that replays queued responses.
///
/// Each fetch pops the next response; once the queue is empty every fetch
/// returns an empty market list.
pub struct ScriptedSource {
    responses: Mutex<VecDeque<Result<Vec<RawMarket>>>>,
    delay: Option<Duration>,
    fetch_count: AtomicU32,
}

impl Default for ScriptedSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            delay: None,
            fetch_count: AtomicU32::new(0),
        }
    }

    pub fn with_markets(self, markets: Vec<RawMarket>) -> Self {
        self.push_ok(markets);
        self
    }

    pub fn with_failure(self, message: &str) -> Self {
        self.push_err(message);
        self
    }

    /// Sleep this long inside every fetch.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn push_ok(&self, markets: Vec<RawMarket>) {
        self.responses.lock().push_back(Ok(markets));
    }

    pub fn push_err(&self, message: &str) {
        self.responses
            .lock()
            .push_back(Err(Error::Upstream(message.to_string())));
    }

    pub fn fetch_count(&self) -> u32 {
        self.fetch_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MarketSource for ScriptedSource {
    async fn fetch_markets(&self) -> Result<Vec<RawMarket>> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    fn source_name(&self) -> &'static str {
        "scripted"
    }
}
