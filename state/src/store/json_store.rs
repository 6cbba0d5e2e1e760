//! JsonStateStore
//! --------------
//! File-backed implementation of the `StateStore` trait. Responsible for
//! durable persistence of the rolling basis series so that:
//!
//!  - z-scores stay stateful across monitoring passes
//!  - one bad write or truncated file never wedges the monitor
//!  - readers never observe a half-written state

use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use tracing::warn;

use super::StateStore;
use crate::model::BasisState;

/// JSON-file persistence for the rolling basis state.
///
/// Loading is best-effort: a missing file is simply an empty state, and a
/// corrupt or unreadable file recovers to an empty state with a warning.
/// `with_strict(true)` opts out of the recovery and surfaces corruption
/// to the caller instead.
pub struct JsonStateStore {
    path: PathBuf,
    strict: bool,
}

impl JsonStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            strict: false,
        }
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl StateStore for JsonStateStore {
    async fn load(&self) -> anyhow::Result<BasisState> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(BasisState::default());
            }
            Err(e) if !self.strict => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "state file unreadable, starting with empty series"
                );
                return Ok(BasisState::default());
            }
            Err(e) => {
                return Err(e).context(format!("reading state file {}", self.path.display()));
            }
        };

        match serde_json::from_slice(&raw) {
            Ok(state) => Ok(state),
            Err(e) if !self.strict => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "state file corrupt, starting with empty series"
                );
                Ok(BasisState::default())
            }
            Err(e) => Err(e).context(format!("parsing state file {}", self.path.display())),
        }
    }

    /// Persist the full state.
    ///
    /// The body goes to a sibling temp file first and is renamed over the
    /// target, so the previous on-disk state stays intact if anything
    /// fails mid-write.
    async fn save(&self, state: &BasisState) -> anyhow::Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                tokio::fs::create_dir_all(dir)
                    .await
                    .with_context(|| format!("creating state directory {}", dir.display()))?;
            }
        }

        let body = serde_json::to_vec_pretty(state).context("serializing basis state")?;

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &body)
            .await
            .with_context(|| format!("writing state file {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("replacing state file {}", self.path.display()))?;

        Ok(())
    }
}
