//! Gamma API response types.
//!
//! Gamma is loose about types: numeric fields arrive as JSON numbers or as
//! strings, and outcomes come either as a `tokens` array or as a pair of
//! JSON-encoded string lists (`outcomes` / `outcomePrices`). A record that
//! still fails to decode is skipped on its own; the rest of the page is kept.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::domain::{RawMarket, RawOutcome};

/// A numeric field that may be encoded as a number or a string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub(crate) enum Loose {
    Number(f64),
    Text(String),
}

impl Loose {
    fn into_text(self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s,
        }
    }
}

/// An outcome list sent either JSON-encoded in a string or as a plain array.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub(crate) enum ListField {
    Encoded(String),
    Items(Vec<Loose>),
}

/// One entry of the `tokens` array.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GammaToken {
    #[serde(default)]
    pub outcome: Option<String>,
    #[serde(default)]
    pub price: Option<Loose>,
}

/// Market record from the Gamma `/markets` endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GammaMarket {
    /// Gamma market ID.
    #[serde(default)]
    id: Option<Loose>,
    #[serde(default)]
    question: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    tokens: Option<Vec<GammaToken>>,
    /// Outcome names (e.g., `"[\"Yes\", \"No\"]"`).
    #[serde(default)]
    outcomes: Option<ListField>,
    /// Outcome prices (e.g., `"[\"0.65\", \"0.35\"]"`).
    #[serde(default)]
    outcome_prices: Option<ListField>,
    #[serde(default, alias = "volume24hr")]
    volume_24hr: Option<Loose>,
    #[serde(default)]
    liquidity: Option<Loose>,
}

impl GammaMarket {
    fn market_id(&self) -> String {
        self.id.clone().map(Loose::into_text).unwrap_or_default()
    }

    fn decode_list(&self, field: &'static str, raw: Option<&ListField>) -> Vec<String> {
        let items = match raw {
            None => Vec::new(),
            Some(ListField::Items(items)) => items.clone(),
            Some(ListField::Encoded(s)) => serde_json::from_str::<Vec<Loose>>(s)
                .map_err(|e| {
                    debug!(
                        error = %e,
                        raw = %s,
                        field,
                        market_id = %self.market_id(),
                        "Failed to parse encoded list"
                    );
                })
                .unwrap_or_default(),
        };
        items.into_iter().map(Loose::into_text).collect()
    }

    fn raw_outcomes(&self) -> Vec<RawOutcome> {
        if let Some(tokens) = &self.tokens {
            return tokens
                .iter()
                .map(|t| RawOutcome {
                    name: t.outcome.clone().unwrap_or_default(),
                    price: t.price.clone().map(Loose::into_text),
                })
                .collect();
        }

        let names = self.decode_list("outcomes", self.outcomes.as_ref());
        let prices = self.decode_list("outcomePrices", self.outcome_prices.as_ref());
        names
            .into_iter()
            .enumerate()
            .map(|(i, name)| RawOutcome {
                name,
                price: prices.get(i).cloned(),
            })
            .collect()
    }
}

impl From<GammaMarket> for RawMarket {
    fn from(m: GammaMarket) -> Self {
        let outcomes = m.raw_outcomes();
        Self {
            id: m.market_id(),
            question: m.question,
            title: m.title,
            created_at: m.created_at,
            outcomes,
            volume_24h: m.volume_24hr.map(Loose::into_text),
            liquidity: m.liquidity.map(Loose::into_text),
        }
    }
}

/// Decode a `/markets` page record by record, dropping records that do not
/// fit [`GammaMarket`].
pub(crate) fn decode_page(records: Vec<Value>) -> Vec<GammaMarket> {
    records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| {
            serde_json::from_value::<GammaMarket>(record)
                .map_err(|e| debug!(error = %e, index, "Skipping malformed market record"))
                .ok()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> RawMarket {
        serde_json::from_str::<GammaMarket>(json).unwrap().into()
    }

    #[test]
    fn token_array_is_preferred() {
        let raw = parse(
            r#"{
                "id": "512",
                "question": "Will it rain?",
                "createdAt": "2025-01-01T00:00:00Z",
                "tokens": [
                    {"outcome": "Yes", "price": 0.62},
                    {"outcome": "No", "price": "0.38"}
                ],
                "outcomes": "[\"Up\", \"Down\"]",
                "volume24hr": 1200.5,
                "liquidity": "3400"
            }"#,
        );

        assert_eq!(raw.id, "512");
        assert_eq!(raw.question.as_deref(), Some("Will it rain?"));
        assert_eq!(raw.outcomes[0], RawOutcome::new("Yes", "0.62"));
        assert_eq!(raw.outcomes[1], RawOutcome::new("No", "0.38"));
        assert_eq!(raw.volume_24h.as_deref(), Some("1200.5"));
        assert_eq!(raw.liquidity.as_deref(), Some("3400"));
    }

    #[test]
    fn encoded_lists_are_used_without_tokens() {
        let raw = parse(
            r#"{
                "id": 7,
                "outcomes": "[\"Yes\", \"No\"]",
                "outcomePrices": "[\"0.97\", \"0.03\"]"
            }"#,
        );

        assert_eq!(raw.id, "7");
        assert_eq!(
            raw.outcomes,
            vec![RawOutcome::new("Yes", "0.97"), RawOutcome::new("No", "0.03")]
        );
        assert!(raw.volume_24h.is_none());
    }

    #[test]
    fn malformed_encoded_list_yields_no_outcomes() {
        let raw = parse(r#"{"id": "x", "outcomes": "not json", "outcomePrices": "[]"}"#);
        assert!(raw.outcomes.is_empty());
    }

    #[test]
    fn plain_outcome_arrays_are_accepted() {
        let raw = parse(r#"{"id": "x", "outcomes": ["Yes", "No"], "outcomePrices": [0.4, "0.6"]}"#);
        assert_eq!(
            raw.outcomes,
            vec![RawOutcome::new("Yes", "0.4"), RawOutcome::new("No", "0.6")]
        );
    }

    #[test]
    fn null_token_outcome_is_tolerated() {
        let raw = parse(r#"{"id": "x", "tokens": [{"outcome": null, "price": 0.5}]}"#);
        assert_eq!(raw.outcomes[0].name, "");
    }

    #[test]
    fn malformed_record_does_not_sink_the_page() {
        let page: Vec<Value> = serde_json::from_str(
            r#"[
                {"id": "good", "tokens": [{"outcome": "Yes", "price": 0.7}, {"outcome": "No", "price": 0.3}]},
                {"id": "bad", "tokens": [{"outcome": 5, "price": 0.5}]},
                {"id": {"nested": true}},
                "not an object"
            ]"#,
        )
        .unwrap();

        let markets = decode_page(page);
        assert_eq!(markets.len(), 1);
        let raw = RawMarket::from(markets.into_iter().next().unwrap());
        assert_eq!(raw.id, "good");
        assert_eq!(raw.outcomes.len(), 2);
    }

    #[test]
    fn missing_prices_stay_unresolved() {
        let raw = parse(r#"{"id": "x", "outcomes": "[\"Yes\", \"No\"]", "outcomePrices": "[\"0.5\"]"}"#);
        assert_eq!(raw.outcomes[1].price, None);
    }
}
