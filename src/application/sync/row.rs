//! Formatting of edges into sink rows.

use crate::domain::EdgeResult;
use crate::port::SheetRow;

/// Format a percent change as `+10.00%`, `-5.00%` or `0.00%`.
///
/// `None` (no prior price) formats as an empty string.
#[must_use]
pub fn format_price_change(change: Option<f64>) -> String {
    let Some(change) = change.filter(|c| c.is_finite()) else {
        return String::new();
    };
    let rounded = format!("{change:.2}");
    // sign follows the rounded value, so +0.004 shows as 0.00%
    if rounded.parse::<f64>().is_ok_and(|r| r > 0.0) {
        format!("+{rounded}%")
    } else {
        format!("{rounded}%")
    }
}

/// Public page for a market, or empty when the id is unknown.
#[must_use]
pub fn market_url(base: &str, edge: &EdgeResult) -> String {
    if edge.market.id.is_empty() {
        String::new()
    } else {
        format!("{}/{}", base.trim_end_matches('/'), edge.market.id)
    }
}

/// Build the sink row for one edge.
#[must_use]
pub fn build_row(
    edge: &EdgeResult,
    price_change: String,
    last_updated: &str,
    url_base: &str,
) -> SheetRow {
    let market = &edge.market;
    SheetRow {
        title: market.title.clone(),
        yes_price: format!("{:.4}", market.yes_price),
        no_price: format!("{:.4}", market.no_price),
        volume_24h: format!("{:.2}", market.volume_24h),
        liquidity: format!("{:.2}", market.liquidity),
        edge_score: format!("{:.2}", edge.edge_score),
        edge_type: edge.tags.to_string(),
        last_updated: last_updated.to_string(),
        price_change,
        market_id: market.id.to_string(),
        url: market_url(url_base, edge),
    }
}
