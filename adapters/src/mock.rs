//! Deterministic source for demos and runner tests: one comfortably quiet
//! market and one under visible microstructure stress.

use async_trait::async_trait;
use chrono::Utc;

use corelib::models::MarketSnapshot;

use crate::MarketDataSource;
use crate::error::SourceError;

#[derive(Debug, Clone, Copy, Default)]
pub struct MockSource;

#[async_trait]
impl MarketDataSource for MockSource {
    async fn fetch(&self, chain: &str) -> Result<Vec<MarketSnapshot>, SourceError> {
        let ts = Utc::now().timestamp();

        Ok(vec![
            MarketSnapshot {
                ts,
                chain: chain.to_string(),
                market: "PT-weETH-2026".to_string(),
                pt_symbol: Some("PT-weETH".to_string()),
                yt_symbol: Some("YT-weETH".to_string()),
                pt_price: None,
                yt_price: None,
                implied_apy: Some(0.18),
                underlying_apy: Some(0.15),
                tvl_usd: Some(25_000_000.0),
                volume_24h_usd: Some(3_500_000.0),
                spread_bps: Some(18.0),
                price_impact_1k_bps: Some(55.0),
            },
            MarketSnapshot {
                ts,
                chain: chain.to_string(),
                market: "PT-ezETH-2026".to_string(),
                pt_symbol: Some("PT-ezETH".to_string()),
                yt_symbol: Some("YT-ezETH".to_string()),
                pt_price: None,
                yt_price: None,
                implied_apy: Some(0.11),
                underlying_apy: Some(0.09),
                tvl_usd: Some(8_000_000.0),
                volume_24h_usd: Some(900_000.0),
                spread_bps: Some(35.0),
                price_impact_1k_bps: Some(140.0),
            },
        ])
    }
}
