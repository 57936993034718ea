//! HTTP API and WebSocket push.
//!
//! | Route             | Purpose                                      |
//! |-------------------|----------------------------------------------|
//! | `/api/health`     | Liveness plus poll and sync status           |
//! | `/api/markets`    | Every normalized market from the last poll   |
//! | `/api/edges`      | Top `limit` edges (default 50)               |
//! | `/api/snapshots`  | Rows read back from the sink (default 10)    |
//! | `/ws`             | `markets-update` on connect and every poll   |

mod routes;
mod ws;

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::application::{EdgeCache, Publisher, SyncStatus};
use crate::error::Result;
use crate::port::EdgeSink;

pub use routes::{parse_limit, DEFAULT_EDGE_LIMIT, DEFAULT_SNAPSHOT_LIMIT};
pub use ws::{MarketsUpdate, MARKETS_UPDATE};

/// Shared handles the handlers read from.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<EdgeCache>,
    pub publisher: Arc<Publisher>,
    pub sync_status: Arc<SyncStatus>,
    /// Present only when the sink is configured.
    pub sink: Option<Arc<dyn EdgeSink>>,
    pub started_at: Instant,
}

impl AppState {
    #[must_use]
    pub fn new(
        cache: Arc<EdgeCache>,
        publisher: Arc<Publisher>,
        sync_status: Arc<SyncStatus>,
        sink: Option<Arc<dyn EdgeSink>>,
    ) -> Self {
        Self {
            cache,
            publisher,
            sync_status,
            sink,
            started_at: Instant::now(),
        }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(routes::health))
        .route("/api/markets", get(routes::markets))
        .route("/api/edges", get(routes::edges))
        .route("/api/snapshots", get(routes::snapshots))
        .route("/ws", get(ws::websocket_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    info!(%addr, "API server listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("API server stopped");
    Ok(())
}
