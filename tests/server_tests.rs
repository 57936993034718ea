//! HTTP API served from the edge cache.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{TimeZone, Utc};
use serde_json::Value;
use tower::ServiceExt;

use edgewatch::adapter::inbound::server::{router, AppState};
use edgewatch::application::{EdgeCache, PollSnapshot, Publisher, SyncOutcome, SyncStatus};
use edgewatch::error::SinkError;
use edgewatch::port::{EdgeSink, SheetRow};
use edgewatch::testkit::domain::{edge, snapshot};
use edgewatch::testkit::RecordingSink;

struct Fixture {
    cache: Arc<EdgeCache>,
    status: Arc<SyncStatus>,
}

impl Fixture {
    fn new() -> Self {
        Self {
            cache: Arc::new(EdgeCache::new()),
            status: Arc::new(SyncStatus::new(true)),
        }
    }

    fn with_edges(self, count: usize) -> Self {
        let edges = (0..count)
            .map(|i| edge(&format!("m{i}"), 0.97, 100.0 - i as f64))
            .collect();
        self.cache.replace(Arc::new(PollSnapshot {
            markets: vec![snapshot("m0", 0.97), snapshot("quiet", 0.5)],
            edges,
            fetched: 2,
            polled_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        }));
        self
    }

    fn app(&self, sink: Option<Arc<dyn EdgeSink>>) -> Router {
        let publisher = Arc::new(Publisher::new(Arc::clone(&self.cache), 4));
        router(AppState::new(
            Arc::clone(&self.cache),
            publisher,
            Arc::clone(&self.status),
            sink,
        ))
    }
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn health_reports_counts_and_sync_status() {
    let fixture = Fixture::new().with_edges(3);
    fixture.status.record(
        &SyncOutcome::Synced { rows_written: 3 },
        Utc.with_ymd_and_hms(2025, 1, 1, 1, 0, 0).unwrap(),
        0,
    );

    let (status, body) = get(fixture.app(None), "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["marketsCount"], 2);
    assert_eq!(body["edgesCount"], 3);
    assert_eq!(body["lastUpdate"], "2025-01-01T00:00:00Z");
    assert_eq!(body["lastSheetsSync"], "2025-01-01T01:00:00Z");
    assert_eq!(body["sync"]["rowsWritten"], 3);
    assert!(body["uptime"].as_f64().unwrap() >= 0.0);
}

#[tokio::test]
async fn health_before_first_poll() {
    let fixture = Fixture::new();
    let (status, body) = get(fixture.app(None), "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["marketsCount"], 0);
    assert!(body["lastUpdate"].is_null());
}

#[tokio::test]
async fn edges_respect_limit_and_report_total() {
    let fixture = Fixture::new().with_edges(60);

    let (_, body) = get(fixture.app(None), "/api/edges").await;
    assert_eq!(body["edges"].as_array().unwrap().len(), 50);
    assert_eq!(body["total"], 60);

    let (_, body) = get(fixture.app(None), "/api/edges?limit=5").await;
    let edges = body["edges"].as_array().unwrap();
    assert_eq!(edges.len(), 5);
    assert_eq!(edges[0]["id"], "m0");
    assert_eq!(edges[0]["edgeScore"], 100.0);

    let (_, body) = get(fixture.app(None), "/api/edges?limit=abc").await;
    assert_eq!(body["edges"].as_array().unwrap().len(), 50);
}

#[tokio::test]
async fn edges_empty_before_first_poll() {
    let fixture = Fixture::new();
    let (status, body) = get(fixture.app(None), "/api/edges").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["edges"], Value::Array(vec![]));
    assert_eq!(body["total"], 0);
    assert!(body["lastUpdate"].is_null());
}

#[tokio::test]
async fn markets_lists_every_normalized_market() {
    let fixture = Fixture::new().with_edges(1);
    let (_, body) = get(fixture.app(None), "/api/markets").await;
    let markets = body["markets"].as_array().unwrap();
    assert_eq!(markets.len(), 2);
    assert_eq!(markets[1]["id"], "quiet");
    assert_eq!(body["lastUpdate"], "2025-01-01T00:00:00Z");
}

#[tokio::test]
async fn snapshots_unavailable_without_sink() {
    let fixture = Fixture::new();
    let (status, body) = get(fixture.app(None), "/api/snapshots").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].as_str().unwrap().contains("not configured"));
}

#[tokio::test]
async fn snapshots_read_back_recent_rows() {
    let sink = Arc::new(RecordingSink::new());
    let rows: Vec<SheetRow> = (0..15)
        .map(|i| SheetRow {
            title: format!("Market {i}"),
            yes_price: "0.9700".into(),
            edge_score: "15.00".into(),
            edge_type: "EXTREME".into(),
            last_updated: "2025-01-01T00:00:00.000Z".into(),
            ..Default::default()
        })
        .collect();
    sink.overwrite(&rows).await.unwrap();

    let fixture = Fixture::new();
    let app = fixture.app(Some(Arc::clone(&sink) as Arc<dyn EdgeSink>));

    let (status, body) = get(app.clone(), "/api/snapshots").await;
    assert_eq!(status, StatusCode::OK);
    let snapshots = body["snapshots"].as_array().unwrap();
    assert_eq!(snapshots.len(), 10);
    assert_eq!(snapshots[0]["market"], "Market 5");
    assert_eq!(snapshots[0]["yesPrice"], 0.97);
    assert_eq!(snapshots[0]["edgeScore"], 15.0);
    assert_eq!(snapshots[0]["edgeType"], "EXTREME");

    let (_, body) = get(app, "/api/snapshots?limit=2").await;
    assert_eq!(body["snapshots"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn snapshots_surface_sink_errors_as_bad_gateway() {
    struct BrokenSink;

    #[async_trait::async_trait]
    impl EdgeSink for BrokenSink {
        async fn connect(&self) -> Result<(), SinkError> {
            Err(SinkError::Connect("no token".into()))
        }
        async fn overwrite(&self, _rows: &[SheetRow]) -> Result<(), SinkError> {
            Ok(())
        }
        async fn recent_rows(&self, _limit: usize) -> Result<Vec<SheetRow>, SinkError> {
            Err(SinkError::Connect("no token".into()))
        }
        fn sink_name(&self) -> &'static str {
            "broken"
        }
    }

    let fixture = Fixture::new();
    let (status, body) = get(fixture.app(Some(Arc::new(BrokenSink))), "/api/snapshots").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("no token"));
}
