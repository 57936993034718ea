//! WebSocket push of poll results.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use super::AppState;
use crate::application::PollSnapshot;
use crate::domain::{EdgeResult, MarketSnapshot};

/// Message type tag.
pub const MARKETS_UPDATE: &str = "markets-update";

/// Payload pushed on connect and after every poll.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketsUpdate<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    markets: &'a [MarketSnapshot],
    edges: &'a [EdgeResult],
    last_update: Option<DateTime<Utc>>,
}

impl<'a> MarketsUpdate<'a> {
    #[must_use]
    pub fn new(snapshot: Option<&'a PollSnapshot>) -> Self {
        Self {
            kind: MARKETS_UPDATE,
            markets: snapshot.map(|s| s.markets.as_slice()).unwrap_or_default(),
            edges: snapshot.map(|s| s.edges.as_slice()).unwrap_or_default(),
            last_update: snapshot.map(|s| s.polled_at),
        }
    }

    fn to_message(&self) -> Option<Message> {
        match serde_json::to_string(self) {
            Ok(text) => Some(Message::Text(text)),
            Err(e) => {
                warn!(error = %e, "Failed to serialize markets update");
                None
            }
        }
    }
}

pub async fn websocket_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: AppState) {
    let mut subscription = state.publisher.subscribe();

    // before the first poll completes there is nothing to replay, so send an
    // empty update rather than leaving the client waiting
    if state.cache.latest().is_none() {
        if let Some(msg) = MarketsUpdate::new(None).to_message() {
            if socket.send(msg).await.is_err() {
                return;
            }
        }
    }

    loop {
        tokio::select! {
            next = subscription.next() => {
                let Some(snapshot) = next else { break };
                let Some(msg) = MarketsUpdate::new(Some(&snapshot)).to_message() else {
                    continue;
                };
                if socket.send(msg).await.is_err() {
                    break;
                }
            }
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                    Some(Ok(_)) => {}
                }
            }
        }
    }
    debug!("WebSocket client disconnected");
}
