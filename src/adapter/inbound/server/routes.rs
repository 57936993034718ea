//! REST handlers.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use super::AppState;
use crate::application::sync::SyncReport;
use crate::domain::{EdgeResult, MarketSnapshot};
use crate::port::SheetRow;

pub const DEFAULT_EDGE_LIMIT: usize = 50;
pub const DEFAULT_SNAPSHOT_LIMIT: usize = 10;

#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    limit: Option<String>,
}

/// Positive integer `limit`, or `default` when absent, zero or malformed.
#[must_use]
pub fn parse_limit(raw: Option<&str>, default: usize) -> usize {
    raw.and_then(|s| s.trim().parse::<usize>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(default)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    status: &'static str,
    /// Seconds since the server started.
    uptime: f64,
    last_update: Option<DateTime<Utc>>,
    last_sheets_sync: Option<DateTime<Utc>>,
    markets_count: usize,
    edges_count: usize,
    sync: SyncReport,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let sync = state.sync_status.report();
    Json(HealthResponse {
        status: "ok",
        uptime: state.started_at.elapsed().as_secs_f64(),
        last_update: state.cache.last_poll_at(),
        last_sheets_sync: sync.last_success,
        markets_count: state.cache.market_count(),
        edges_count: state.cache.edge_count(),
        sync,
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketsResponse {
    markets: Vec<MarketSnapshot>,
    last_update: Option<DateTime<Utc>>,
}

pub async fn markets(State(state): State<AppState>) -> Json<MarketsResponse> {
    let latest = state.cache.latest();
    Json(MarketsResponse {
        markets: latest.as_ref().map(|s| s.markets.clone()).unwrap_or_default(),
        last_update: latest.map(|s| s.polled_at),
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgesResponse {
    edges: Vec<EdgeResult>,
    total: usize,
    last_update: Option<DateTime<Utc>>,
}

pub async fn edges(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Json<EdgesResponse> {
    let limit = parse_limit(query.limit.as_deref(), DEFAULT_EDGE_LIMIT);
    Json(EdgesResponse {
        edges: state.cache.latest_edges(limit),
        total: state.cache.edge_count(),
        last_update: state.cache.last_poll_at(),
    })
}

/// One row read back from the sink.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentSnapshot {
    timestamp: String,
    market: String,
    yes_price: Option<f64>,
    edge_score: Option<f64>,
    edge_type: String,
    price_change: String,
}

impl From<SheetRow> for RecentSnapshot {
    fn from(row: SheetRow) -> Self {
        Self {
            yes_price: row.yes_price.trim().parse().ok(),
            edge_score: row.edge_score.trim().parse().ok(),
            timestamp: row.last_updated,
            market: row.title,
            edge_type: row.edge_type,
            price_change: row.price_change,
        }
    }
}

pub async fn snapshots(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Response {
    let Some(sink) = state.sink.as_ref() else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "error": "sheet sync is not configured" })),
        )
            .into_response();
    };

    let limit = parse_limit(query.limit.as_deref(), DEFAULT_SNAPSHOT_LIMIT);
    match sink.recent_rows(limit).await {
        Ok(rows) => {
            let snapshots: Vec<RecentSnapshot> = rows.into_iter().map(Into::into).collect();
            Json(json!({ "snapshots": snapshots })).into_response()
        }
        Err(e) => {
            warn!(sink = sink.sink_name(), error = %e, "Failed to read snapshots");
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}
