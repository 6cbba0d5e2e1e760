use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Hard cap on entries kept per market series.
pub const SERIES_CAP: usize = 240;

/// Rolling per-market basis history, persisted across passes.
///
/// Each series is chronological, oldest first, and holds normalized basis
/// values only. `update_series` is the only mutation path, so a series
/// can never grow past its cap. Markets are never evicted; the per-market
/// cap bounds total growth.
///
/// Persisted shape: `{"series": {"<market>": [f64, ...]}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BasisState {
    #[serde(default)]
    pub series: HashMap<String, Vec<f64>>,
}

impl BasisState {
    /// Append `basis` to the market's series, creating it on first use,
    /// then truncate from the front once the series exceeds `cap`.
    /// Returns the updated series.
    pub fn update_series(&mut self, market: &str, basis: f64, cap: usize) -> &[f64] {
        let series = self.series.entry(market.to_string()).or_default();
        series.push(basis);
        if series.len() > cap {
            series.drain(..series.len() - cap);
        }
        series
    }

    /// History for one market; empty if it has never produced a basis.
    pub fn history(&self, market: &str) -> &[f64] {
        self.series.get(market).map(Vec::as_slice).unwrap_or(&[])
    }
}
