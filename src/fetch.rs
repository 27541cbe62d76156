use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::Value;

use crate::config::{AssetConfig, SourceConfig};
use crate::error::{Context, Result};

const FETCH_TIMEOUT: Duration = Duration::from_secs(20);

/// Latest prices keyed by display name, in configuration order.
///
/// Order matters: it fixes the history CSV column schema on first write and
/// drives alert ordering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSnapshot {
    entries: Vec<(String, f64)>,
}

impl PriceSnapshot {
    pub fn push(&mut self, name: impl Into<String>, price: f64) {
        self.entries.push((name.into(), price));
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|&(_, price)| price)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(name, price)| (name.as_str(), *price))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, f64)> for PriceSnapshot {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Fetch current prices for every configured asset in a single request.
///
/// Issues one GET with the comma-joined source ids; non-2xx statuses and
/// network errors propagate, there is no retry.
pub fn fetch_prices(assets: &[AssetConfig], source: &SourceConfig) -> Result<PriceSnapshot> {
    let client = Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .context("Failed to construct price HTTP client")?;

    let ids = assets
        .iter()
        .map(|asset| asset.id.as_str())
        .collect::<Vec<_>>()
        .join(",");

    let response = client
        .get(&source.url)
        .query(&[
            ("ids", ids.as_str()),
            ("vs_currencies", source.vs_currency.as_str()),
        ])
        .send()
        .with_context(|| format!("Price request failed for {}", source.url))?
        .error_for_status()
        .context("Price request returned error status")?;

    let body = response.text().context("Failed to read price response body")?;
    let root: Value = serde_json::from_str(&body).context("Failed to parse price JSON")?;

    Ok(decode_prices(&root, assets, &source.vs_currency))
}

/// Pull per-asset quotes out of the `{ <id>: { <currency>: <number> } }`
/// payload. Assets missing either key are skipped, not errors.
pub fn decode_prices(root: &Value, assets: &[AssetConfig], vs_currency: &str) -> PriceSnapshot {
    let mut snapshot = PriceSnapshot::default();
    for asset in assets {
        let Some(price) = root
            .get(&asset.id)
            .and_then(|entry| entry.get(vs_currency))
            .and_then(Value::as_f64)
        else {
            continue;
        };
        snapshot.push(asset.name.clone(), price);
    }
    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assets() -> Vec<AssetConfig> {
        vec![
            AssetConfig {
                id: "bitcoin".to_string(),
                name: "BTC".to_string(),
                color: None,
                upper: None,
                lower: None,
            },
            AssetConfig {
                id: "ethereum".to_string(),
                name: "ETH".to_string(),
                color: None,
                upper: None,
                lower: None,
            },
            AssetConfig {
                id: "dogecoin".to_string(),
                name: "DOGE".to_string(),
                color: None,
                upper: None,
                lower: None,
            },
        ]
    }

    #[test]
    fn decodes_quote_payload_in_config_order() {
        let payload: Value = serde_json::from_str(
            r#"{
                "ethereum": { "usd": 2400.5 },
                "bitcoin": { "usd": 61000.0 },
                "dogecoin": { "usd": 0.12 }
            }"#,
        )
        .unwrap();

        let snapshot = decode_prices(&payload, &assets(), "usd");

        let entries: Vec<_> = snapshot.iter().collect();
        assert_eq!(
            entries,
            vec![("BTC", 61000.0), ("ETH", 2400.5), ("DOGE", 0.12)]
        );
    }

    #[test]
    fn skips_assets_missing_from_response() {
        let payload: Value = serde_json::from_str(r#"{ "bitcoin": { "usd": 61000.0 } }"#).unwrap();

        let snapshot = decode_prices(&payload, &assets(), "usd");

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.get("BTC"), Some(61000.0));
        assert_eq!(snapshot.get("ETH"), None);
    }

    #[test]
    fn skips_assets_missing_the_currency_key() {
        let payload: Value = serde_json::from_str(
            r#"{
                "bitcoin": { "eur": 56000.0 },
                "ethereum": { "usd": 2400.5 }
            }"#,
        )
        .unwrap();

        let snapshot = decode_prices(&payload, &assets(), "usd");

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.get("ETH"), Some(2400.5));
    }

    #[test]
    fn skips_non_numeric_quotes() {
        let payload: Value =
            serde_json::from_str(r#"{ "bitcoin": { "usd": "not-a-number" } }"#).unwrap();

        let snapshot = decode_prices(&payload, &assets(), "usd");

        assert!(snapshot.is_empty());
    }
}
