//! Infrastructure bootstrap helpers for runtime wiring.

use std::sync::Arc;

use tracing::{info, warn};

use crate::adapter::outbound::polymarket::GammaClient;
use crate::adapter::outbound::sheets::SheetsSink;
use crate::application::fanout::DEFAULT_CAPACITY;
use crate::application::{EdgeCache, PollOrchestrator, Publisher, SyncEngine, SyncStatus};
use crate::infrastructure::config::Config;
use crate::port::{Clock, EdgeSink, MarketSource};

/// Everything the runtime drives, fully wired.
pub struct Components {
    pub cache: Arc<EdgeCache>,
    pub publisher: Arc<Publisher>,
    pub poller: Arc<PollOrchestrator>,
    /// Absent when sheet sync is disabled or unconfigured.
    pub sync: Option<SyncEngine>,
    pub sync_status: Arc<SyncStatus>,
    pub sink: Option<Arc<dyn EdgeSink>>,
}

/// Build the Gamma market source.
pub fn build_source(config: &Config) -> Arc<dyn MarketSource> {
    Arc::new(GammaClient::new(
        config.source.api_url.clone(),
        config.source.limit,
        config.source.request_timeout(),
    ))
}

/// Build the spreadsheet sink, if sync is enabled and credentials are present.
///
/// Missing credentials disable only the sync task; polling and the API keep
/// running.
pub fn build_sink(config: &Config) -> Option<Arc<dyn EdgeSink>> {
    if !config.sync.enabled {
        info!("Sheet sync disabled by configuration");
        return None;
    }
    match config.sheets.sink_config() {
        Some(sheets) => {
            info!(
                spreadsheet_id = %sheets.spreadsheet_id,
                worksheet = %sheets.worksheet_title,
                "Sheet sync configured"
            );
            Some(Arc::new(SheetsSink::new(sheets)))
        }
        None => {
            warn!(
                missing = ?config.sheets.missing(),
                "Google Sheets credentials not configured; skipping sheet sync"
            );
            None
        }
    }
}

/// Wire the application services around the given ports.
pub fn assemble(
    config: &Config,
    source: Arc<dyn MarketSource>,
    sink: Option<Arc<dyn EdgeSink>>,
    clock: Arc<dyn Clock>,
) -> Components {
    let cache = Arc::new(EdgeCache::new());
    let publisher = Arc::new(Publisher::new(Arc::clone(&cache), DEFAULT_CAPACITY));
    let poller = Arc::new(PollOrchestrator::new(
        source,
        Arc::clone(&cache),
        Arc::clone(&publisher),
        Arc::clone(&clock),
    ));
    let sync = sink
        .as_ref()
        .map(|sink| SyncEngine::new(Arc::clone(sink), clock, config.sync.settings()));
    let sync_status = Arc::new(SyncStatus::new(sync.is_some()));

    Components {
        cache,
        publisher,
        poller,
        sync,
        sync_status,
        sink,
    }
}
