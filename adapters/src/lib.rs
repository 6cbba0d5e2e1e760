pub mod error;
pub mod mock;
pub mod pendle;

use async_trait::async_trait;
use corelib::models::MarketSnapshot;

use crate::error::SourceError;

/// A pollable upstream producing one snapshot per market per pass.
///
/// An empty result is a valid answer ("nothing to score"), not a failure.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    async fn fetch(&self, chain: &str) -> Result<Vec<MarketSnapshot>, SourceError>;
}
