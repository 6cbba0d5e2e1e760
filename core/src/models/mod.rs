pub mod market_models;

pub use market_models::{MarketSnapshot, ShockSignal};
