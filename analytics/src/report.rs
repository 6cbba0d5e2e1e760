use corelib::models::{MarketSnapshot, ShockSignal};

use crate::metrics::BasisMetrics;

/// Flat per-market row handed to the presentation side: the raw snapshot
/// fields plus everything the engine derived for it this pass. Markets
/// that produced no signal still get a row, with score and reason absent.
#[derive(Debug, Clone)]
pub struct ReportRow {
    pub market: String,
    pub implied_apy: Option<f64>,
    pub underlying_apy: Option<f64>,
    pub basis: Option<f64>,
    pub basis_z: Option<f64>,
    pub convexity_proxy: Option<f64>,
    pub whale_shock: bool,
    pub spread_bps: Option<f64>,
    pub price_impact_1k_bps: Option<f64>,
    pub tvl_usd: Option<f64>,
    pub volume_24h_usd: Option<f64>,
    pub score: Option<f64>,
    pub reason: Option<String>,
}

impl ReportRow {
    pub fn new(
        snapshot: &MarketSnapshot,
        metrics: &BasisMetrics,
        signal: Option<&ShockSignal>,
    ) -> Self {
        Self {
            market: snapshot.market.clone(),
            implied_apy: snapshot.implied_apy,
            underlying_apy: snapshot.underlying_apy,
            basis: metrics.basis,
            basis_z: metrics.basis_z,
            convexity_proxy: metrics.convexity_proxy,
            whale_shock: metrics.whale_shock,
            spread_bps: snapshot.spread_bps,
            price_impact_1k_bps: snapshot.price_impact_1k_bps,
            tvl_usd: snapshot.tvl_usd,
            volume_24h_usd: snapshot.volume_24h_usd,
            score: signal.map(|s| s.score),
            reason: signal.map(|s| s.reason.clone()),
        }
    }
}
