//! Console rendering of a pass outcome.
//!
//! Presentation only: everything printed here comes straight off the
//! `ReportRow` set and the ranked signal list, with no further logic.

use analytics::report::ReportRow;
use corelib::models::ShockSignal;

/// Per-market table of raw and derived fields, one row per snapshot.
pub fn print_market_table(rows: &[ReportRow]) {
    if rows.is_empty() {
        return;
    }

    println!(
        "\n{:<24} {:>8} {:>8} {:>8} {:>8} {:>8} {:>6} {:>8} {:>8} {:>12} {:>12} {:>6}",
        "market",
        "implied",
        "under",
        "basis",
        "z",
        "convex",
        "whale",
        "spread",
        "impact",
        "tvl",
        "vol24h",
        "score",
    );

    for r in rows {
        println!(
            "{:<24} {:>8} {:>8} {:>8} {:>8} {:>8} {:>6} {:>8} {:>8} {:>12} {:>12} {:>6}",
            r.market,
            pct(r.implied_apy),
            pct(r.underlying_apy),
            pct(r.basis),
            num(r.basis_z, 2),
            num(r.convexity_proxy, 2),
            if r.whale_shock { "yes" } else { "no" },
            num(r.spread_bps, 0),
            num(r.price_impact_1k_bps, 0),
            num(r.tvl_usd, 0),
            num(r.volume_24h_usd, 0),
            num(r.score, 2),
        );
    }
}

/// Ranked signal list, highest score first.
pub fn print_signals(signals: &[ShockSignal]) {
    if signals.is_empty() {
        println!("No shock-like signals found.");
        return;
    }

    println!("\nTop signals:");
    for sig in signals {
        let s = &sig.snapshot;
        println!(
            "- {}: score={:.2} | {} | tvl=${:.0} | vol24h=${:.0}",
            sig.market,
            sig.score,
            sig.reason,
            s.tvl_usd.unwrap_or(0.0),
            s.volume_24h_usd.unwrap_or(0.0),
        );
    }
}

fn num(v: Option<f64>, precision: usize) -> String {
    match v {
        Some(v) => format!("{v:.precision$}"),
        None => "-".to_string(),
    }
}

/// Fractional APY-like value rendered as a percentage.
fn pct(v: Option<f64>) -> String {
    match v {
        Some(v) => format!("{:.2}%", v * 100.0),
        None => "-".to_string(),
    }
}
