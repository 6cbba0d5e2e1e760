use clap::Parser;
use tracing::{Instrument, info};

use adapters::MarketDataSource;
use adapters::mock::MockSource;
use adapters::pendle::PendleApiSource;
use analytics::detector::LiquidityShockDetector;
use cli::cli::{Cli, detector_config};
use cli::report;
use cli::run::run_pass;
use common::logger::{TraceId, init_logger, pass_span};
use state::store::json_store::JsonStateStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger("basiswatch");

    let args = Cli::parse();

    let trace_id = TraceId::default();
    let span = pass_span("monitor", &trace_id);

    run(args).instrument(span).await
}

async fn run(args: Cli) -> anyhow::Result<()> {
    let detector = LiquidityShockDetector::new(detector_config(&args));
    let store = JsonStateStore::new(&args.state_path).with_strict(args.strict_state);

    let source: Box<dyn MarketDataSource> = if args.mock {
        Box::new(MockSource)
    } else {
        Box::new(PendleApiSource::default())
    };

    let outcome = run_pass(source.as_ref(), &store, &detector, &args.chain).await?;

    info!(
        signals = outcome.signals.len(),
        markets = outcome.rows.len(),
        "pass complete"
    );

    report::print_market_table(&outcome.rows);
    report::print_signals(&outcome.signals);

    Ok(())
}
