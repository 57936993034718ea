//! Sheets v4 request bodies and URLs.

use reqwest::StatusCode;
use serde_json::{json, Value};
use url::Url;

use crate::port::SHEET_HEADERS;

pub(crate) const API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Zero-based index of the Edge Score column (F).
const SCORE_COLUMN: usize = 5;

/// A1 range in `title`, quoting the title as Sheets expects.
pub(crate) fn a1(title: &str, cells: &str) -> String {
    format!("'{}'!{cells}", title.replace('\'', "''"))
}

/// Range holding every data row below the header, open-ended downwards.
pub(crate) fn data_range(title: &str) -> String {
    a1(title, "A2:K")
}

/// Header row range.
pub(crate) fn header_range(title: &str) -> String {
    a1(title, "A1:K1")
}

/// `{API_BASE}/{spreadsheet_id}/{segments...}` with each segment escaped.
pub(crate) fn endpoint(base: &str, spreadsheet_id: &str, segments: &[&str]) -> Result<Url, String> {
    let mut url = Url::parse(base).map_err(|e| format!("invalid sheets endpoint: {e}"))?;
    url.path_segments_mut()
        .map_err(|()| "sheets endpoint cannot be a base".to_string())?
        .push(spreadsheet_id)
        .extend(segments);
    Ok(url)
}

pub(crate) fn add_sheet(title: &str) -> Value {
    json!({
        "requests": [{ "addSheet": { "properties": { "title": title } } }]
    })
}

pub(crate) fn header_values() -> Value {
    json!({ "values": [SHEET_HEADERS] })
}

pub(crate) fn row_values(rows: &[Vec<String>]) -> Value {
    json!({ "values": rows })
}

fn point(red: f64, green: f64, blue: f64, value: &str) -> Value {
    json!({
        "color": { "red": red, "green": green, "blue": blue },
        "type": "NUMBER",
        "value": value
    })
}

/// Gradient on the Edge Score column below the header: 0 light yellow,
/// 30 yellow, 60 green.
pub(crate) fn score_gradient(sheet_id: i64) -> Value {
    json!({
        "requests": [{
            "addConditionalFormatRule": {
                "index": 0,
                "rule": {
                    "ranges": [{
                        "sheetId": sheet_id,
                        "startRowIndex": 1,
                        "startColumnIndex": SCORE_COLUMN,
                        "endColumnIndex": SCORE_COLUMN + 1
                    }],
                    "gradientRule": {
                        "minpoint": point(1.0, 1.0, 0.5, "0"),
                        "midpoint": point(1.0, 1.0, 0.0, "30"),
                        "maxpoint": point(0.0, 1.0, 0.0, "60")
                    }
                }
            }
        }]
    })
}

/// Message for a non-success response. 429s always read as rate limited.
pub(crate) fn http_failure(action: &str, status: StatusCode, body: &str) -> String {
    if status == StatusCode::TOO_MANY_REQUESTS {
        format!("{action}: HTTP {status} rate limited: {body}")
    } else {
        format!("{action}: HTTP {status}: {body}")
    }
}
