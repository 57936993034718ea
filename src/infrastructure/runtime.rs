//! Runtime lifecycle: poll task, sync task and API server.

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{info, warn};

use super::bootstrap::{assemble, build_sink, build_source, Components};
use crate::adapter::inbound::server::{self, AppState};
use crate::error::Result;
use crate::infrastructure::config::Config;
use crate::port::SystemClock;

/// Run until `shutdown` flips to true.
pub async fn run_with_shutdown(config: Config, shutdown: watch::Receiver<bool>) -> Result<()> {
    let addr = config.server.bind_addr();
    let listener = TcpListener::bind(&addr).await?;

    let source = build_source(&config);
    let sink = build_sink(&config);
    let components = assemble(&config, source, sink, Arc::new(SystemClock));

    run_components(&config, components, listener, shutdown).await
}

/// Drive already-wired components on `listener`.
///
/// The poll and sync tasks observe `shutdown` between cycles; an in-flight
/// cycle always completes before its task exits.
pub async fn run_components(
    config: &Config,
    components: Components,
    listener: TcpListener,
    shutdown: watch::Receiver<bool>,
) -> Result<()> {
    let Components {
        cache,
        publisher,
        poller,
        sync,
        sync_status,
        sink,
    } = components;

    info!(
        interval_ms = config.poll.interval_ms,
        sync_interval_ms = config.sync.interval_ms,
        sync_enabled = sync.is_some(),
        "Starting edgewatch"
    );

    let poll_task = {
        let shutdown = shutdown.clone();
        let interval = config.poll.interval();
        tokio::spawn(async move { poller.run(interval, shutdown).await })
    };

    let sync_task = sync.map(|engine| {
        let cache = Arc::clone(&cache);
        let status = Arc::clone(&sync_status);
        let shutdown = shutdown.clone();
        let interval = config.sync.interval();
        tokio::spawn(engine.run(cache, interval, status, shutdown))
    });

    let state = AppState::new(cache, publisher, sync_status, sink);
    let mut stop = shutdown.clone();
    let served = server::serve(listener, state, async move {
        let _ = stop.wait_for(|stopped| *stopped).await;
    })
    .await;

    if let Err(e) = &served {
        warn!(error = %e, "API server failed; stopping tasks");
        poll_task.abort();
        if let Some(task) = &sync_task {
            task.abort();
        }
        return served;
    }

    if let Err(e) = poll_task.await {
        warn!(error = %e, "Poll task ended abnormally");
    }
    if let Some(task) = sync_task {
        if let Err(e) = task.await {
            warn!(error = %e, "Sync task ended abnormally");
        }
    }

    info!("edgewatch stopped");
    served
}
