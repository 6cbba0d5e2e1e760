//! Basis Metrics (dislocation layer)
//!
//! This module derives per-market dislocation metrics from a single
//! snapshot plus that market's rolling basis history.
//!
//! ## What "basis" means here
//! Yield markets split a position into a principal token (PT) and a yield
//! token (YT). The market's implied APY can drift away from the APY the
//! underlying actually pays. That difference is the basis:
//!
//! ```text
//! basis = implied_apy - underlying_apy
//! ```
//!
//! - `basis > 0` → the fixed-yield leg trades rich
//! - `basis < 0` → the fixed-yield leg trades cheap
//!
//! ## Statistical normalization
//! A raw basis number means little on its own, so it is normalized against
//! the market's own recent history as a sample z-score over a sliding
//! window. The z-score stays absent until enough history exists and
//! whenever the window is too flat to divide by.
//!
//! ## Missing data
//! Every upstream field is optional. A missing input never errors; it
//! leaves the dependent metric absent. Absent and zero are different
//! things, and only the former disables a metric.
//!
//! ## Determinism
//! All functions here are pure and deterministic given the snapshot and
//! the history slice. Any I/O (fetching, state, logging) lives outside
//! this module.

use std::fmt;

use corelib::models::MarketSnapshot;

/// Minimum history length before a z-score is defined at all.
pub const MIN_HISTORY: usize = 20;

/// The z-score window: at most this many of the most recent history
/// entries. Bounds memory and lets the statistic adapt to regime shifts.
pub const Z_WINDOW: usize = 120;

/// Sample deviations at or below this floor suppress the z-score instead
/// of dividing by a numerically degenerate spread.
pub const STD_FLOOR: f64 = 1e-10;

/// Price impact (bps) for the reference 1k trade that counts as whale
/// stress on its own.
pub const WHALE_IMPACT_BPS: f64 = 120.0;

/// Quoted spread (bps) that counts as whale stress on its own.
pub const WHALE_SPREAD_BPS: f64 = 30.0;

/// 24h volume to TVL ratio that counts as whale stress on its own.
pub const WHALE_VOLUME_TVL_RATIO: f64 = 0.25;

/// Derived metrics for one snapshot. Immutable once computed.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BasisMetrics {
    /// implied APY minus underlying APY, when both are known.
    pub basis: Option<f64>,
    /// Sample z-score of the current basis against recent history.
    pub basis_z: Option<f64>,
    /// YT/PT price ratio minus 1. A cheap stand-in for how rich the yield
    /// leg is relative to the principal leg, without a pricing model.
    pub convexity_proxy: Option<f64>,
    /// Any one of the three microstructure-stress conditions tripped.
    pub whale_shock: bool,
}

/// Compute all dislocation metrics for one snapshot.
///
/// `history` is the market's rolling basis series from previous passes,
/// oldest first. The current snapshot's own basis must not be in it yet.
pub fn compute_metrics(s: &MarketSnapshot, history: &[f64]) -> BasisMetrics {
    let basis = match (s.implied_apy, s.underlying_apy) {
        (Some(implied), Some(underlying)) => Some(implied - underlying),
        _ => None,
    };

    let basis_z = match basis {
        Some(b) if history.len() >= MIN_HISTORY => {
            basis_z_score(b, &history[history.len().saturating_sub(Z_WINDOW)..])
        }
        _ => None,
    };

    let convexity_proxy = match (s.yt_price, s.pt_price) {
        (Some(yt), Some(pt)) if pt > 0.0 => Some(yt / pt - 1.0),
        _ => None,
    };

    BasisMetrics {
        basis,
        basis_z,
        convexity_proxy,
        whale_shock: is_whale_shock(s),
    }
}

/// Z-score of `basis` against the window.
///
/// Sample statistics with Bessel's correction (divide by n-1); windows of
/// two or fewer points are treated as having zero deviation. Returns
/// `None` when the deviation sits at or below `STD_FLOOR`.
fn basis_z_score(basis: f64, window: &[f64]) -> Option<f64> {
    let n = window.len();
    let mean = window.iter().sum::<f64>() / n as f64;

    let std = if n > 2 {
        let var = window.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        var.sqrt()
    } else {
        0.0
    };

    (std > STD_FLOOR).then(|| (basis - mean) / std)
}

/// OR across three independent stress conditions; any one trips the flag.
/// A missing field leaves its condition untripped.
fn is_whale_shock(s: &MarketSnapshot) -> bool {
    if s.price_impact_1k_bps
        .is_some_and(|impact| impact >= WHALE_IMPACT_BPS)
    {
        return true;
    }

    if s.spread_bps.is_some_and(|spread| spread >= WHALE_SPREAD_BPS) {
        return true;
    }

    match (s.volume_24h_usd, s.tvl_usd) {
        (Some(volume), Some(tvl)) if tvl > 0.0 => volume / tvl >= WHALE_VOLUME_TVL_RATIO,
        _ => false,
    }
}

/// Additive mean-reversion evidence score.
///
/// Each term is bounded, so no single factor can dominate:
/// - `min(4.0, |z| / 2)` when the z-score is defined
/// - flat +2.0 on a whale shock
/// - flat +1.0 when `|convexity_proxy| >= 0.2`
pub fn mean_reversion_score(m: &BasisMetrics) -> f64 {
    let mut score = 0.0;

    if let Some(z) = m.basis_z {
        score += f64::min(4.0, z.abs() / 2.0);
    }
    if m.whale_shock {
        score += 2.0;
    }
    if m.convexity_proxy.is_some_and(|c| c.abs() >= 0.2) {
        score += 1.0;
    }

    score
}

/// Three-way classification of where the basis sits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TradeHint {
    /// No basis could be computed.
    InsufficientData,
    /// Implied APY rich vs underlying.
    Rich,
    /// Implied APY cheap vs underlying.
    Cheap,
}

impl fmt::Display for TradeHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TradeHint::InsufficientData => "insufficient basis data",
            TradeHint::Rich => {
                "watch: implied APY rich vs underlying; consider mean-reversion fade after liquidity shock"
            }
            TradeHint::Cheap => {
                "watch: implied APY cheap vs underlying; wait for normalization trigger"
            }
        };
        f.write_str(s)
    }
}

pub fn trade_hint(m: &BasisMetrics) -> TradeHint {
    match m.basis {
        None => TradeHint::InsufficientData,
        Some(b) if b > 0.0 => TradeHint::Rich,
        Some(_) => TradeHint::Cheap,
    }
}
