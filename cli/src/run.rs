//! One monitoring pass: fetch, score, roll the state forward, rank.

use std::sync::Arc;

use tracing::{Instrument, info};

use adapters::MarketDataSource;
use analytics::detector::LiquidityShockDetector;
use analytics::metrics;
use analytics::ranking::rank_signals;
use analytics::report::ReportRow;
use common::logger::child_span;
use corelib::models::ShockSignal;
use state::model::SERIES_CAP;
use state::store::StateStore;

/// Everything one pass produced: ranked signals plus the full per-market
/// row set for presentation.
pub struct PassOutcome {
    pub signals: Vec<ShockSignal>,
    pub rows: Vec<ReportRow>,
}

/// Run one full pass against the given source and state store.
///
/// Each market is scored against the history from *previous* passes; its
/// current basis is appended afterwards, and the whole state is persisted
/// before the outcome is returned. An empty fetch result means "nothing
/// to score", not an error; a failed save is a real error.
pub async fn run_pass(
    source: &dyn MarketDataSource,
    store: &dyn StateStore,
    detector: &LiquidityShockDetector,
    chain: &str,
) -> anyhow::Result<PassOutcome> {
    let mut state = store.load().instrument(child_span("load_state")).await?;

    let snapshots = source
        .fetch(chain)
        .instrument(child_span("fetch"))
        .await?;
    info!(chain, markets = snapshots.len(), "fetched snapshots");

    let mut signals = Vec::new();
    let mut rows = Vec::new();

    for snapshot in snapshots {
        let snapshot = Arc::new(snapshot);

        let m = metrics::compute_metrics(&snapshot, state.history(&snapshot.market));
        let signal = detector.score_metrics(&snapshot, &m);

        rows.push(ReportRow::new(&snapshot, &m, signal.as_ref()));
        if let Some(signal) = signal {
            signals.push(signal);
        }

        // History rolls forward whenever a basis exists, signal or not.
        if let Some(basis) = m.basis {
            state.update_series(&snapshot.market, basis, SERIES_CAP);
        }
    }

    store
        .save(&state)
        .instrument(child_span("save_state"))
        .await?;

    rank_signals(&mut signals);

    Ok(PassOutcome { signals, rows })
}
