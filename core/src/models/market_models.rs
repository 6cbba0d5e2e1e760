use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// One yield-market observation at one point in time.
///
/// Upstream APIs deliver these best-effort, so every numeric field is an
/// `Option`: an absent value disables whatever depends on it downstream,
/// which is not the same thing as the value being zero (a 0 bps spread is
/// a real, very tight market).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// Observation time, unix seconds.
    pub ts: i64,
    pub chain: String,

    /// Market address / identifier. Unique per chain+market and stable
    /// across polls; this is the key into the rolling basis history.
    pub market: String,

    #[serde(default)]
    pub pt_symbol: Option<String>,
    #[serde(default)]
    pub yt_symbol: Option<String>,

    // pricing-like fields (best-effort; depends on source)
    #[serde(default)]
    pub pt_price: Option<f64>,
    #[serde(default)]
    pub yt_price: Option<f64>,
    #[serde(default)]
    pub implied_apy: Option<f64>,
    #[serde(default)]
    pub underlying_apy: Option<f64>,

    // liquidity / microstructure proxies
    #[serde(default)]
    pub tvl_usd: Option<f64>,
    #[serde(default)]
    pub volume_24h_usd: Option<f64>,
    #[serde(default)]
    pub spread_bps: Option<f64>,
    #[serde(default)]
    pub price_impact_1k_bps: Option<f64>,
}

/// Scored dislocation signal for one market in one pass.
///
/// Only ever constructed with `score > 0`; a market that accumulates no
/// score produces no signal at all.
#[derive(Debug, Clone)]
pub struct ShockSignal {
    pub market: String,
    pub score: f64,
    /// Comma-joined human-readable fragments, one per contributing factor.
    pub reason: String,
    /// Originating snapshot, shared read-only with the reporting side.
    pub snapshot: Arc<MarketSnapshot>,
}
