//! [`EdgeSink`] backed by a Google Sheets worksheet.

use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::{Client as HttpClient, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::auth::{ServiceAccount, TokenSource};
use super::request::{self, API_BASE};
use crate::error::SinkError;
use crate::port::{EdgeSink, SheetRow};

/// Worksheet the edges are mirrored into.
pub const DEFAULT_WORKSHEET_TITLE: &str = "Edge Candidates";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Where and as whom to write.
#[derive(Debug, Clone)]
pub struct SheetsConfig {
    pub spreadsheet_id: String,
    pub worksheet_title: String,
    pub account: ServiceAccount,
}

#[derive(Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetProperties {
    sheet_id: i64,
    title: String,
}

#[derive(Deserialize)]
struct BatchUpdateReply {
    #[serde(default)]
    replies: Vec<Value>,
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// Writes edge rows to a worksheet, creating it on first connect.
pub struct SheetsSink {
    http: HttpClient,
    tokens: TokenSource,
    config: SheetsConfig,
    api_base: String,
    sheet_id: RwLock<Option<i64>>,
}

impl SheetsSink {
    #[must_use]
    pub fn new(config: SheetsConfig) -> Self {
        let http = HttpClient::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });
        let tokens = TokenSource::new(http.clone(), config.account.clone());
        Self {
            http,
            tokens,
            config,
            api_base: API_BASE.to_string(),
            sheet_id: RwLock::new(None),
        }
    }

    #[must_use]
    pub fn config(&self) -> &SheetsConfig {
        &self.config
    }

    fn url(&self, segments: &[&str]) -> Result<url::Url, String> {
        request::endpoint(&self.api_base, &self.config.spreadsheet_id, segments)
    }

    async fn send(&self, action: &str, builder: RequestBuilder) -> Result<Response, String> {
        let token = self.tokens.token().await?;
        let response = builder
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| format!("{action}: {e}"))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(request::http_failure(action, status, &body))
    }

    async fn find_worksheet(&self) -> Result<Option<i64>, String> {
        let mut url = self.url(&[])?;
        url.query_pairs_mut().append_pair("fields", "sheets.properties");
        let response = self
            .send("load spreadsheet", self.http.get(url))
            .await?;
        let meta: SpreadsheetMeta = response
            .json()
            .await
            .map_err(|e| format!("load spreadsheet: {e}"))?;
        Ok(meta
            .sheets
            .into_iter()
            .find(|s| s.properties.title == self.config.worksheet_title)
            .map(|s| s.properties.sheet_id))
    }

    async fn create_worksheet(&self) -> Result<i64, String> {
        let title = &self.config.worksheet_title;
        let batch = format!("{}:batchUpdate", self.config.spreadsheet_id);
        let url = request::endpoint(&self.api_base, &batch, &[])?;

        let response = self
            .send(
                "add worksheet",
                self.http.post(url.clone()).json(&request::add_sheet(title)),
            )
            .await?;
        let reply: BatchUpdateReply = response
            .json()
            .await
            .map_err(|e| format!("add worksheet: {e}"))?;
        let sheet_id = reply
            .replies
            .first()
            .and_then(|r| r["addSheet"]["properties"]["sheetId"].as_i64())
            .ok_or_else(|| "add worksheet: reply carried no sheet id".to_string())?;

        // formatting is cosmetic; a failure here does not fail the connect
        if let Err(e) = self
            .send(
                "apply conditional format",
                self.http.post(url).json(&request::score_gradient(sheet_id)),
            )
            .await
        {
            warn!(error = %e, "Failed to apply conditional formatting");
        }

        info!(title = %title, sheet_id, "Created worksheet");
        Ok(sheet_id)
    }

    /// Write the header row. Idempotent, so it runs on every connect.
    async fn write_header(&self) -> Result<(), String> {
        let range = request::header_range(&self.config.worksheet_title);
        let mut url = self.url(&["values", &range])?;
        url.query_pairs_mut().append_pair("valueInputOption", "RAW");
        self.send("write header", self.http.put(url).json(&request::header_values()))
            .await?;
        Ok(())
    }

    async fn clear_rows(&self) -> Result<(), String> {
        let range = format!("{}:clear", request::data_range(&self.config.worksheet_title));
        let url = self.url(&["values", &range])?;
        self.send("clear rows", self.http.post(url).json(&serde_json::json!({})))
            .await?;
        Ok(())
    }

    async fn write_rows(&self, rows: &[SheetRow]) -> Result<(), String> {
        let range = request::a1(&self.config.worksheet_title, "A2");
        let mut url = self.url(&["values", &range])?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "USER_ENTERED");
        let values: Vec<Vec<String>> = rows.iter().map(SheetRow::to_values).collect();
        self.send("write rows", self.http.put(url).json(&request::row_values(&values)))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl EdgeSink for SheetsSink {
    async fn connect(&self) -> Result<(), SinkError> {
        if self.sheet_id.read().is_some() {
            return Ok(());
        }

        let existing = self.find_worksheet().await.map_err(SinkError::Connect)?;
        let sheet_id = match existing {
            Some(id) => {
                debug!(title = %self.config.worksheet_title, sheet_id = id, "Using existing worksheet");
                id
            }
            None => self.create_worksheet().await.map_err(SinkError::Connect)?,
        };
        self.write_header().await.map_err(SinkError::Connect)?;

        *self.sheet_id.write() = Some(sheet_id);
        info!(
            spreadsheet_id = %self.config.spreadsheet_id,
            title = %self.config.worksheet_title,
            "Google Sheets connected"
        );
        Ok(())
    }

    async fn overwrite(&self, rows: &[SheetRow]) -> Result<(), SinkError> {
        self.clear_rows().await.map_err(SinkError::Write)?;
        if !rows.is_empty() {
            self.write_rows(rows).await.map_err(SinkError::Write)?;
        }
        Ok(())
    }

    async fn recent_rows(&self, limit: usize) -> Result<Vec<SheetRow>, SinkError> {
        self.connect().await?;

        let range = request::data_range(&self.config.worksheet_title);
        let url = self.url(&["values", &range]).map_err(SinkError::Write)?;
        let response = self
            .send("read rows", self.http.get(url))
            .await
            .map_err(SinkError::Write)?;
        let body: ValueRange = response
            .json()
            .await
            .map_err(|e| SinkError::Write(format!("read rows: {e}")))?;

        let skip = body.values.len().saturating_sub(limit);
        Ok(body
            .values
            .iter()
            .skip(skip)
            .map(|values| SheetRow::from_values(values))
            .collect())
    }

    fn sink_name(&self) -> &'static str {
        "google-sheets"
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::extract::State;
    use axum::http::{Method, StatusCode, Uri};
    use axum::response::IntoResponse;
    use axum::{Json, Router};
    use parking_lot::Mutex;
    use serde_json::json;
    use tokio::net::TcpListener;

    use super::*;

    const SPREADSHEET: &str = "sheet-1";

    #[derive(Debug, Clone)]
    struct Call {
        method: Method,
        path: String,
        body: String,
    }

    #[derive(Default)]
    struct FakeSheets {
        existing: Mutex<bool>,
        fail_header_writes: Mutex<u32>,
        calls: Mutex<Vec<Call>>,
    }

    async fn handle(
        State(fake): State<Arc<FakeSheets>>,
        method: Method,
        uri: Uri,
        body: String,
    ) -> axum::response::Response {
        let path = uri.path().to_string();
        fake.calls.lock().push(Call {
            method: method.clone(),
            path: path.clone(),
            body,
        });

        if method == Method::PUT && path.ends_with("A1:K1") {
            let mut failures = fake.fail_header_writes.lock();
            if *failures > 0 {
                *failures -= 1;
                return (StatusCode::INTERNAL_SERVER_ERROR, "backend error").into_response();
            }
        }
        if path.ends_with(":batchUpdate") {
            if body_has_add_sheet(&fake, &path) {
                *fake.existing.lock() = true;
            }
            return Json(json!({ "replies": [{ "addSheet": { "properties": { "sheetId": 7 } } }] }))
                .into_response();
        }
        if method == Method::GET && path.ends_with(SPREADSHEET) {
            let sheets = if *fake.existing.lock() {
                json!([{ "properties": { "sheetId": 3, "title": DEFAULT_WORKSHEET_TITLE } }])
            } else {
                json!([])
            };
            return Json(json!({ "sheets": sheets })).into_response();
        }
        Json(json!({})).into_response()
    }

    fn body_has_add_sheet(fake: &FakeSheets, path: &str) -> bool {
        fake.calls
            .lock()
            .last()
            .is_some_and(|c| c.path == path && c.body.contains("addSheet"))
    }

    async fn sink_against(fake: Arc<FakeSheets>) -> SheetsSink {
        let app = Router::new().fallback(handle).with_state(fake);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}/v4/spreadsheets", listener.local_addr().unwrap());
        tokio::spawn(async move { axum::serve(listener, app).await });

        let account = ServiceAccount::new("svc@example.iam", "unused");
        let http = HttpClient::new();
        SheetsSink {
            tokens: TokenSource::preloaded(http.clone(), account.clone(), "test-token"),
            http,
            config: SheetsConfig {
                spreadsheet_id: SPREADSHEET.into(),
                worksheet_title: DEFAULT_WORKSHEET_TITLE.into(),
                account,
            },
            api_base: base,
            sheet_id: RwLock::new(None),
        }
    }

    fn path_of(sink: &SheetsSink, segments: &[&str]) -> String {
        sink.url(segments).unwrap().path().to_string()
    }

    fn row(id: &str) -> SheetRow {
        SheetRow {
            title: format!("Market {id}"),
            market_id: id.into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn overwrite_clears_open_ended_range_before_writing() {
        let fake = Arc::new(FakeSheets {
            existing: Mutex::new(true),
            ..Default::default()
        });
        let sink = sink_against(Arc::clone(&fake)).await;
        sink.connect().await.unwrap();

        let rows: Vec<SheetRow> = (0..1500).map(|i| row(&i.to_string())).collect();
        sink.overwrite(&rows).await.unwrap();
        sink.overwrite(&rows[..10]).await.unwrap();

        let clear = format!("{}:clear", request::data_range(DEFAULT_WORKSHEET_TITLE));
        let clear_path = path_of(&sink, &["values", &clear]);
        let write_path = path_of(
            &sink,
            &["values", &request::a1(DEFAULT_WORKSHEET_TITLE, "A2")],
        );

        let calls = fake.calls.lock().clone();
        let data_calls: Vec<_> = calls
            .iter()
            .filter(|c| c.path == clear_path || c.path == write_path)
            .map(|c| (c.method.clone(), c.path == clear_path))
            .collect();
        assert_eq!(
            data_calls,
            vec![
                (Method::POST, true),
                (Method::PUT, false),
                (Method::POST, true),
                (Method::PUT, false),
            ]
        );
        assert!(!clear_path.contains("1000"));

        let last_write = calls.iter().rev().find(|c| c.path == write_path).unwrap();
        let body: Value = serde_json::from_str(&last_write.body).unwrap();
        assert_eq!(body["values"].as_array().unwrap().len(), 10);
    }

    #[tokio::test]
    async fn connect_writes_header_to_existing_worksheet() {
        let fake = Arc::new(FakeSheets {
            existing: Mutex::new(true),
            ..Default::default()
        });
        let sink = sink_against(Arc::clone(&fake)).await;
        sink.connect().await.unwrap();

        let header_path = path_of(
            &sink,
            &["values", &request::header_range(DEFAULT_WORKSHEET_TITLE)],
        );
        let calls = fake.calls.lock().clone();
        assert!(calls
            .iter()
            .any(|c| c.method == Method::PUT && c.path == header_path));
        assert!(!calls.iter().any(|c| c.path.ends_with(":batchUpdate")));
    }

    #[tokio::test]
    async fn failed_header_write_is_repaired_on_next_connect() {
        let fake = Arc::new(FakeSheets {
            fail_header_writes: Mutex::new(1),
            ..Default::default()
        });
        let sink = sink_against(Arc::clone(&fake)).await;

        let err = sink.connect().await.unwrap_err();
        assert!(matches!(err, SinkError::Connect(_)));
        assert!(sink.sheet_id.read().is_none());

        // the worksheet now exists, so the retry reuses it and only rewrites the header
        sink.connect().await.unwrap();
        assert_eq!(*sink.sheet_id.read(), Some(3));

        let header_path = path_of(
            &sink,
            &["values", &request::header_range(DEFAULT_WORKSHEET_TITLE)],
        );
        let header_writes = fake
            .calls
            .lock()
            .iter()
            .filter(|c| c.method == Method::PUT && c.path == header_path)
            .count();
        assert_eq!(header_writes, 2);
        let adds = fake
            .calls
            .lock()
            .iter()
            .filter(|c| c.body.contains("addSheet"))
            .count();
        assert_eq!(adds, 1);
    }

    #[tokio::test]
    async fn created_worksheet_gets_gradient() {
        let fake = Arc::new(FakeSheets::default());
        let sink = sink_against(Arc::clone(&fake)).await;
        sink.connect().await.unwrap();

        let batches: Vec<Value> = fake
            .calls
            .lock()
            .iter()
            .filter(|c| c.path.ends_with(":batchUpdate"))
            .map(|c| serde_json::from_str(&c.body).unwrap())
            .collect();
        assert_eq!(batches.len(), 2);
        assert!(batches[0]["requests"][0].get("addSheet").is_some());
        assert_eq!(
            batches[1]["requests"][0]["addConditionalFormatRule"]["rule"]["ranges"][0]["sheetId"],
            7
        );
    }
}
