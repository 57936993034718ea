//! Full wiring: poll task, sync task and API server on a real socket.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::watch;

use edgewatch::infrastructure::bootstrap::assemble;
use edgewatch::infrastructure::config::Config;
use edgewatch::infrastructure::runtime::run_components;
use edgewatch::port::{EdgeSink, MarketSource};
use edgewatch::testkit::domain::raw_market;
use edgewatch::testkit::{FixedClock, RecordingSink, ScriptedSource};

const FAST_INTERVALS: &str = r#"
[poll]
interval_ms = 50

[sync]
interval_ms = 50
"#;

async fn health(base: &str) -> Value {
    reqwest::get(format!("{base}/api/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn polls_serves_and_syncs_until_shutdown() {
    let config = Config::parse_toml_with_env(FAST_INTERVALS, &|_| None).unwrap();

    let source = Arc::new(ScriptedSource::new());
    for _ in 0..200 {
        source.push_ok(vec![
            raw_market("a", "0.99", "0.01"),
            raw_market("b", "0.50", "0.50"),
        ]);
    }
    let sink = Arc::new(RecordingSink::new());
    let components = assemble(
        &config,
        Arc::clone(&source) as Arc<dyn MarketSource>,
        Some(Arc::clone(&sink) as Arc<dyn EdgeSink>),
        Arc::new(FixedClock::epoch()),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let (tx, rx) = watch::channel(false);
    let server = tokio::spawn(async move {
        run_components(&config, components, listener, rx).await
    });

    let mut body = health(&base).await;
    for _ in 0..100 {
        if body["edgesCount"] == 1 && body["sync"]["rowsWritten"] == 1 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
        body = health(&base).await;
    }
    assert_eq!(body["status"], "ok");
    assert_eq!(body["marketsCount"], 2);
    assert_eq!(body["edgesCount"], 1);
    assert_eq!(body["sync"]["rowsWritten"], 1);
    assert_eq!(sink.rows()[0].market_id, "a");

    tx.send(true).unwrap();
    tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .unwrap()
        .unwrap()
        .unwrap();

    let fetches = source.fetch_count();
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(source.fetch_count(), fetches);
}
