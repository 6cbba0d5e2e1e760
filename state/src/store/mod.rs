pub mod json_store;

use crate::model::BasisState;

/// Persistence boundary for the rolling basis state. The engine only ever
/// sees a loaded `BasisState` and hands a full one back; the mechanics of
/// where and how it lives belong to the implementation.
#[async_trait::async_trait]
pub trait StateStore: Send + Sync {
    async fn load(&self) -> anyhow::Result<BasisState>;
    async fn save(&self, state: &BasisState) -> anyhow::Result<()>;
}
