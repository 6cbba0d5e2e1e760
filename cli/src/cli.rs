use clap::Parser;

use analytics::detector::DetectorConfig;

#[derive(Debug, Parser)]
#[clap(name = "basiswatch", version)]
pub struct Cli {
    /// Chain to poll markets for
    #[clap(long, default_value = "ethereum")]
    pub chain: String,

    /// Use the built-in mock source instead of the live API
    #[clap(long)]
    pub mock: bool,

    /// Where the rolling basis state lives
    #[clap(long, default_value = "output/basis_state.json")]
    pub state_path: String,

    /// Markets below this TVL (USD) are skipped entirely
    #[clap(long, default_value_t = 1_000_000.0)]
    pub min_tvl_usd: f64,

    /// Spread (bps) above which a market counts as stressed
    #[clap(long, default_value_t = 30.0)]
    pub spread_bps_hi: f64,

    /// Fail on a corrupt state file instead of starting empty
    #[clap(long)]
    pub strict_state: bool,
}

/// Map CLI overrides onto the detector's threshold set.
pub fn detector_config(cli: &Cli) -> DetectorConfig {
    DetectorConfig {
        min_tvl_usd: cli.min_tvl_usd,
        spread_bps_hi: cli.spread_bps_hi,
        ..DetectorConfig::default()
    }
}
