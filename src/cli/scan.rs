//! Handler for the `scan` command.

use std::sync::Arc;

use tabled::{Table, Tabled};

use crate::application::PollError;
use crate::cli::{output, ScanArgs};
use crate::domain::EdgeResult;
use crate::error::{Error, Result};
use crate::infrastructure::bootstrap::{assemble, build_source};
use crate::infrastructure::config::Config;
use crate::port::SystemClock;

const TITLE_WIDTH: usize = 60;

#[derive(Tabled)]
struct EdgeRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "Market")]
    title: String,
    #[tabled(rename = "Yes")]
    yes: String,
    #[tabled(rename = "No")]
    no: String,
    #[tabled(rename = "Volume 24h")]
    volume: String,
    #[tabled(rename = "Liquidity")]
    liquidity: String,
    #[tabled(rename = "Score")]
    score: String,
    #[tabled(rename = "Edge Type")]
    tags: String,
}

fn truncate(title: &str) -> String {
    if title.chars().count() <= TITLE_WIDTH {
        return title.to_string();
    }
    let mut short: String = title.chars().take(TITLE_WIDTH - 1).collect();
    short.push('…');
    short
}

/// Render the top `limit` edges as a table.
#[must_use]
pub fn render_edges(edges: &[EdgeResult], limit: usize) -> String {
    let rows = edges.iter().take(limit).enumerate().map(|(i, edge)| EdgeRow {
        rank: i + 1,
        title: truncate(&edge.market.title),
        yes: format!("{:.4}", edge.market.yes_price),
        no: format!("{:.4}", edge.market.no_price),
        volume: format!("{:.2}", edge.market.volume_24h),
        liquidity: format!("{:.2}", edge.market.liquidity),
        score: format!("{:.2}", edge.edge_score),
        tags: edge.tags.to_string(),
    });
    Table::new(rows).to_string()
}

/// Execute the scan command.
pub async fn execute(args: &ScanArgs) -> Result<()> {
    let config = Config::load_or_default(&args.config)?;
    config.init_logging();

    let components = assemble(&config, build_source(&config), None, Arc::new(SystemClock));
    let snapshot = components
        .poller
        .poll_once()
        .await
        .map_err(|e| match e {
            PollError::Fetch(inner) => inner,
            other => Error::Upstream(other.to_string()),
        })?;

    output::section(&format!(
        "{} edges from {} markets ({} fetched)",
        snapshot.edges.len(),
        snapshot.markets.len(),
        snapshot.fetched
    ));
    if snapshot.edges.is_empty() {
        output::note("No edge candidates this cycle.");
        return Ok(());
    }
    for line in render_edges(&snapshot.edges, args.limit).lines() {
        println!("  {line}");
    }
    Ok(())
}
