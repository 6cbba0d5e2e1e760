//! Liquidity-Shock Detector (composite scorer)
//!
//! Turns one snapshot plus its derived metrics into at most one scored
//! signal. Every stress condition that trips contributes two things at
//! once: a bounded point contribution and a human-readable reason
//! fragment. The two are never separated, so the reason string always
//! accounts for the score.
//!
//! ## Scoring model
//! Deliberately additive and capped per term. Independent evidence
//! sources add bounded points; nothing multiplies, so no single dimension
//! can saturate the composite. Appropriate for noisy, partially-missing
//! upstream data.
//!
//! ## Gates
//! Two distinct "no signal" outcomes, neither of which is an error:
//! - the TVL gate skips illiquid markets before any scoring happens
//! - a final score of zero suppresses the signal entirely
//!
//! ## Failure semantics
//! There is no failure path in here. A missing optional field disables
//! its term and nothing else.

use std::sync::Arc;

use corelib::models::{MarketSnapshot, ShockSignal};

use crate::metrics::{self, BasisMetrics, TradeHint};

/// Detection thresholds. Each is independently tunable.
#[derive(Clone, Copy, Debug)]
pub struct DetectorConfig {
    /// Markets below this TVL are skipped outright; thin markets produce
    /// noisy microstructure readings regardless of stress.
    pub min_tvl_usd: f64,
    /// Spread high-water mark (bps).
    pub spread_bps_hi: f64,
    /// Price-impact high-water mark for the reference 1k trade (bps).
    pub impact_bps_hi: f64,
    /// 24h volume to TVL ratio high-water mark.
    pub volume_tvl_ratio_hi: f64,
    /// Z-score magnitude worth calling out in the reason string. Does not
    /// gate the score.
    pub basis_z_hi: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            min_tvl_usd: 1_000_000.0,
            spread_bps_hi: 30.0,
            impact_bps_hi: 120.0,
            volume_tvl_ratio_hi: 0.25,
            basis_z_hi: 2.0,
        }
    }
}

#[derive(Debug, Default)]
pub struct LiquidityShockDetector {
    cfg: DetectorConfig,
}

impl LiquidityShockDetector {
    pub fn new(cfg: DetectorConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.cfg
    }

    /// Score one snapshot against its rolling basis history.
    ///
    /// `history` must hold past basis values only; the current snapshot's
    /// basis is appended by the caller after scoring.
    pub fn score(&self, snapshot: &Arc<MarketSnapshot>, history: &[f64]) -> Option<ShockSignal> {
        let m = metrics::compute_metrics(snapshot, history);
        self.score_metrics(snapshot, &m)
    }

    /// Score with metrics the caller already computed, so one metrics pass
    /// can feed both scoring and reporting.
    pub fn score_metrics(
        &self,
        snapshot: &Arc<MarketSnapshot>,
        m: &BasisMetrics,
    ) -> Option<ShockSignal> {
        // Missing TVL counts as zero: an untracked market is gated out.
        if snapshot.tvl_usd.unwrap_or(0.0) < self.cfg.min_tvl_usd {
            return None;
        }

        let mut score = 0.0;
        let mut reasons: Vec<String> = Vec::new();

        // Microstructure stress
        if let Some(spread) = snapshot.spread_bps {
            if spread >= self.cfg.spread_bps_hi {
                score += f64::min(2.0, spread / self.cfg.spread_bps_hi);
                reasons.push(format!("wide spread ({spread:.0} bps)"));
            }
        }

        if let Some(impact) = snapshot.price_impact_1k_bps {
            if impact >= self.cfg.impact_bps_hi {
                score += f64::min(3.0, impact / self.cfg.impact_bps_hi);
                reasons.push(format!("high impact@1k ({impact:.0} bps)"));
            }
        }

        if let (Some(volume), Some(tvl)) = (snapshot.volume_24h_usd, snapshot.tvl_usd) {
            if tvl > 0.0 {
                let ratio = volume / tvl;
                if ratio >= self.cfg.volume_tvl_ratio_hi {
                    score += f64::min(2.0, ratio / self.cfg.volume_tvl_ratio_hi);
                    reasons.push(format!("volume/tvl spike ({ratio:.2})"));
                }
            }
        }

        // Basis + convexity layer
        score += metrics::mean_reversion_score(m);

        if let Some(basis) = m.basis {
            reasons.push(format!("basis={:.2}%", basis * 100.0));
        }
        if let Some(z) = m.basis_z {
            if z.abs() >= self.cfg.basis_z_hi {
                reasons.push(format!("basis {z:.2}σ"));
            }
        }
        if let Some(convexity) = m.convexity_proxy {
            reasons.push(format!("yt_convexity={convexity:.2}"));
        }
        if m.whale_shock {
            reasons.push("whale-liquidity shock".to_string());
        }

        let hint = metrics::trade_hint(m);
        if hint != TradeHint::InsufficientData {
            reasons.push(hint.to_string());
        }

        if score <= 0.0 {
            return None;
        }

        Some(ShockSignal {
            market: snapshot.market.clone(),
            score,
            reason: reasons.join(", "),
            snapshot: Arc::clone(snapshot),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> MarketSnapshot {
        MarketSnapshot {
            ts: 1_700_000_000,
            chain: "ethereum".into(),
            market: "PT-test-2026".into(),
            pt_symbol: None,
            yt_symbol: None,
            pt_price: None,
            yt_price: None,
            implied_apy: None,
            underlying_apy: None,
            tvl_usd: None,
            volume_24h_usd: None,
            spread_bps: None,
            price_impact_1k_bps: None,
        }
    }

    fn detector() -> LiquidityShockDetector {
        LiquidityShockDetector::default()
    }

    #[test]
    fn tvl_gate_skips_small_markets_under_extreme_stress() {
        let mut s = snapshot();
        s.tvl_usd = Some(500_000.0);
        s.volume_24h_usd = Some(5_000_000.0);
        s.spread_bps = Some(400.0);
        s.price_impact_1k_bps = Some(2_000.0);
        s.implied_apy = Some(0.40);
        s.underlying_apy = Some(0.05);

        assert!(detector().score(&Arc::new(s), &[]).is_none());
    }

    #[test]
    fn missing_tvl_counts_as_zero_at_the_gate() {
        let mut s = snapshot();
        s.spread_bps = Some(400.0);
        s.price_impact_1k_bps = Some(2_000.0);

        assert!(detector().score(&Arc::new(s), &[]).is_none());
    }

    #[test]
    fn spread_and_impact_worked_example() {
        let mut s = snapshot();
        s.tvl_usd = Some(8_000_000.0);
        s.volume_24h_usd = Some(900_000.0); // ratio 0.1125, below threshold
        s.spread_bps = Some(35.0);
        s.price_impact_1k_bps = Some(140.0);

        let sig = detector().score(&Arc::new(s), &[]).unwrap();

        // 35/30 + 140/120 + whale flat 2.0 (both conditions trip the flag)
        let expected = 35.0 / 30.0 + 140.0 / 120.0 + 2.0;
        assert!((sig.score - expected).abs() < 1e-9);

        assert!(sig.reason.contains("wide spread (35 bps)"));
        assert!(sig.reason.contains("high impact@1k (140 bps)"));
        assert!(!sig.reason.contains("volume/tvl spike"));
        assert!(!sig.reason.contains("basis="));
    }

    #[test]
    fn every_term_capped_and_summed() {
        let mut s = snapshot();
        s.tvl_usd = Some(2_000_000.0);
        s.volume_24h_usd = Some(5_000_000.0); // ratio 2.5, 10x threshold
        s.spread_bps = Some(300.0); // 10x threshold
        s.price_impact_1k_bps = Some(1_200.0); // 10x threshold

        let m = BasisMetrics {
            basis: Some(0.10),
            basis_z: Some(40.0),
            convexity_proxy: Some(0.5),
            whale_shock: true,
        };

        let sig = detector().score_metrics(&Arc::new(s), &m).unwrap();

        // caps: 2.0 + 3.0 + 2.0 micro, 4.0 z, 2.0 whale, 1.0 convexity
        assert!((sig.score - 14.0).abs() < 1e-9);

        for fragment in [
            "wide spread",
            "high impact@1k",
            "volume/tvl spike",
            "basis=10.00%",
            "basis 40.00σ",
            "yt_convexity=0.50",
            "whale-liquidity shock",
            "implied APY rich",
        ] {
            assert!(sig.reason.contains(fragment), "missing: {fragment}");
        }
    }

    #[test]
    fn quiet_market_is_suppressed() {
        let mut s = snapshot();
        s.tvl_usd = Some(5_000_000.0);
        s.volume_24h_usd = Some(250_000.0);
        s.spread_bps = Some(10.0);
        s.price_impact_1k_bps = Some(20.0);

        assert!(detector().score(&Arc::new(s), &[]).is_none());
    }

    #[test]
    fn z_below_annotation_threshold_still_contributes() {
        let s = {
            let mut s = snapshot();
            s.tvl_usd = Some(5_000_000.0);
            s
        };

        let m = BasisMetrics {
            basis: Some(0.01),
            basis_z: Some(1.0),
            convexity_proxy: None,
            whale_shock: false,
        };

        let sig = detector().score_metrics(&Arc::new(s), &m).unwrap();

        assert!((sig.score - 0.5).abs() < 1e-12);
        assert!(sig.reason.contains("basis=1.00%"));
        assert!(!sig.reason.contains("σ"));
    }

    #[test]
    fn scoring_is_idempotent() {
        let mut s = snapshot();
        s.tvl_usd = Some(8_000_000.0);
        s.spread_bps = Some(35.0);
        s.price_impact_1k_bps = Some(140.0);
        s.implied_apy = Some(0.12);
        s.underlying_apy = Some(0.10);
        let s = Arc::new(s);

        let history: Vec<f64> = (0..40).map(|i| 0.01 + (i % 5) as f64 * 0.001).collect();

        let a = detector().score(&s, &history).unwrap();
        let b = detector().score(&s, &history).unwrap();

        assert_eq!(a.score, b.score);
        assert_eq!(a.reason, b.reason);
    }

    #[test]
    fn cheap_basis_gets_the_normalization_hint() {
        let s = {
            let mut s = snapshot();
            s.tvl_usd = Some(5_000_000.0);
            s.spread_bps = Some(60.0);
            s
        };

        let m = BasisMetrics {
            basis: Some(-0.02),
            basis_z: None,
            convexity_proxy: None,
            whale_shock: true,
        };

        let sig = detector().score_metrics(&Arc::new(s), &m).unwrap();
        assert!(sig.reason.contains("wait for normalization trigger"));
    }
}
