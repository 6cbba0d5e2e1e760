//! Best-effort Pendle REST source.
//!
//! Public market APIs drift, so this module is deliberately defensive:
//! several endpoint shapes are tried in order, payloads are mapped
//! loosely, and any field that fails to coerce simply stays absent on the
//! snapshot (downstream scoring already treats absent fields as disabled
//! terms, never as zeros).

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde_json::Value;
use tracing::warn;

use corelib::models::MarketSnapshot;

use crate::MarketDataSource;
use crate::error::SourceError;

pub const DEFAULT_BASE_URL: &str = "https://api.pendle.finance";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct PendleApiSource {
    client: Client,
    base_url: String,
}

impl PendleApiSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }
}

impl Default for PendleApiSource {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait]
impl MarketDataSource for PendleApiSource {
    /// Try each known endpoint shape in order; the first one that answers
    /// with usable JSON wins. Only after every endpoint has failed does
    /// the fetch surface an error.
    async fn fetch(&self, chain: &str) -> Result<Vec<MarketSnapshot>, SourceError> {
        let endpoints = [
            format!("{}/core/v1/markets", self.base_url),
            format!("{}/core/v1/markets?chain={chain}", self.base_url),
            format!("{}/core/v2/markets?chain={chain}", self.base_url),
        ];

        let mut last = String::from("no endpoints attempted");
        for url in endpoints {
            match self.try_endpoint(&url, chain).await {
                Ok(snapshots) => return Ok(snapshots),
                Err(e) => {
                    warn!(%url, error = %e, "market endpoint failed, trying next");
                    last = e.to_string();
                }
            }
        }

        Err(SourceError::Exhausted { last })
    }
}

impl PendleApiSource {
    async fn try_endpoint(
        &self,
        url: &str,
        chain: &str,
    ) -> Result<Vec<MarketSnapshot>, SourceError> {
        let resp = self
            .client
            .get(url)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|source| SourceError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: url.to_string(),
                status,
            });
        }

        let data: Value = resp.json().await.map_err(|source| SourceError::Decode {
            url: url.to_string(),
            source,
        })?;

        Ok(map_markets(&data, chain, Utc::now().timestamp()))
    }
}

/// Map a loosely-shaped markets payload into snapshots.
///
/// Accepts the list under `markets`, under `data`, or as the bare
/// top-level array. Items without a usable identifier are dropped.
pub fn map_markets(data: &Value, chain: &str, ts: i64) -> Vec<MarketSnapshot> {
    let items = data
        .get("markets")
        .or_else(|| data.get("data"))
        .unwrap_or(data);

    let Some(items) = items.as_array() else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| map_market(item, chain, ts))
        .collect()
}

fn map_market(item: &Value, chain: &str, ts: i64) -> Option<MarketSnapshot> {
    let market = ["address", "market", "id", "name"]
        .iter()
        .find_map(|k| item.get(k).and_then(Value::as_str))
        .filter(|m| !m.is_empty())?
        .to_string();

    Some(MarketSnapshot {
        ts,
        chain: chain.to_string(),
        market,
        pt_symbol: pick_str(item, &["ptSymbol", "pt"]),
        yt_symbol: pick_str(item, &["ytSymbol", "yt"]),
        pt_price: pick_f64(item, &["ptPrice", "ptPriceUsd"]),
        yt_price: pick_f64(item, &["ytPrice", "ytPriceUsd"]),
        implied_apy: pick_f64(item, &["impliedApy", "apy"]),
        underlying_apy: pick_f64(item, &["underlyingApy", "underlyingInterestApy"]),
        tvl_usd: pick_f64(item, &["tvl", "tvlUsd"]),
        volume_24h_usd: pick_f64(item, &["volume24h", "volume24hUsd"]),
        spread_bps: pick_f64(item, &["spreadBps", "spread"]),
        price_impact_1k_bps: pick_f64(item, &["priceImpact1kBps", "impactBps"]),
    })
}

fn pick_str(item: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|k| item.get(k).and_then(Value::as_str))
        .map(str::to_string)
}

fn pick_f64(item: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|k| coerce_f64(item.get(k)?))
}

/// Tolerant numeric coercion: numbers pass through, numeric strings
/// parse, anything else is treated as absent.
fn coerce_f64(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn maps_items_under_the_markets_key() {
        let data = json!({
            "markets": [
                {
                    "address": "0xabc",
                    "impliedApy": 0.18,
                    "underlyingApy": "0.15",
                    "tvl": 25_000_000.0,
                    "volume24h": 3_500_000.0,
                    "spreadBps": 18,
                    "priceImpact1kBps": 55
                }
            ]
        });

        let snaps = map_markets(&data, "ethereum", 1_700_000_000);
        assert_eq!(snaps.len(), 1);

        let s = &snaps[0];
        assert_eq!(s.market, "0xabc");
        assert_eq!(s.chain, "ethereum");
        assert_eq!(s.implied_apy, Some(0.18));
        assert_eq!(s.underlying_apy, Some(0.15)); // string coerced
        assert_eq!(s.spread_bps, Some(18.0));
        assert_eq!(s.price_impact_1k_bps, Some(55.0));
    }

    #[test]
    fn maps_items_under_the_data_key_and_bare_arrays() {
        let under_data = json!({"data": [{"market": "PT-a", "tvl": 1.0}]});
        assert_eq!(map_markets(&under_data, "ethereum", 0).len(), 1);

        let bare = json!([{"id": "PT-b"}]);
        assert_eq!(map_markets(&bare, "ethereum", 0).len(), 1);
    }

    #[test]
    fn items_without_an_identifier_are_dropped() {
        let data = json!({"markets": [{"tvl": 5.0}, {"name": "PT-kept"}]});

        let snaps = map_markets(&data, "ethereum", 0);
        assert_eq!(snaps.len(), 1);
        assert_eq!(snaps[0].market, "PT-kept");
    }

    #[test]
    fn unparseable_fields_stay_absent_not_zero() {
        let data = json!({
            "markets": [
                {"address": "0xabc", "spreadBps": "n/a", "tvl": {"nested": 1}}
            ]
        });

        let s = &map_markets(&data, "ethereum", 0)[0];
        assert_eq!(s.spread_bps, None);
        assert_eq!(s.tvl_usd, None);
    }

    #[test]
    fn non_array_payload_maps_to_nothing() {
        let data = json!({"markets": {"oops": true}});
        assert!(map_markets(&data, "ethereum", 0).is_empty());
    }
}
