//! Sources of raw ledger snapshots.

use crate::error::LoaderError;
use crate::records::LedgerSnapshot;
use crate::registry::InMemoryRegistry;
use async_trait::async_trait;
use bridge_amm_domain::entities::Currency;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Fetches every pool record at one point in time.
#[async_trait]
pub trait PoolStateLoader: Send + Sync {
    async fn load_snapshot(&self) -> Result<LedgerSnapshot, LoaderError>;
}

/// Loader returning a fixed snapshot.
#[derive(Debug, Clone)]
pub struct InMemoryLoader {
    snapshot: LedgerSnapshot,
}

impl InMemoryLoader {
    #[must_use]
    pub fn new(snapshot: LedgerSnapshot) -> Self {
        Self { snapshot }
    }
}

#[async_trait]
impl PoolStateLoader for InMemoryLoader {
    async fn load_snapshot(&self) -> Result<LedgerSnapshot, LoaderError> {
        Ok(self.snapshot.clone())
    }
}

/// On-disk snapshot layout: the currency table plus the raw records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotFile {
    pub currencies: Vec<Currency>,
    pub snapshot: LedgerSnapshot,
}

impl SnapshotFile {
    /// Registry over the file's currency table.
    #[must_use]
    pub fn registry(&self) -> InMemoryRegistry {
        InMemoryRegistry::new(self.currencies.iter().cloned())
    }
}

/// Loader reading a [`SnapshotFile`] from disk on every call.
#[derive(Debug, Clone)]
pub struct JsonSnapshotLoader {
    path: PathBuf,
}

impl JsonSnapshotLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn read_file(&self) -> Result<SnapshotFile, LoaderError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| LoaderError::Io {
                path: self.path.display().to_string(),
                source,
            })?;
        let file: SnapshotFile = serde_json::from_str(&raw)?;
        debug!(
            path = %self.path.display(),
            currencies = file.currencies.len(),
            block = file.snapshot.block_number,
            "Read snapshot file"
        );
        Ok(file)
    }

    /// Registry over the currency table of the file.
    pub async fn registry(&self) -> Result<InMemoryRegistry, LoaderError> {
        Ok(self.read_file().await?.registry())
    }
}

#[async_trait]
impl PoolStateLoader for JsonSnapshotLoader {
    async fn load_snapshot(&self) -> Result<LedgerSnapshot, LoaderError> {
        Ok(self.read_file().await?.snapshot)
    }
}
