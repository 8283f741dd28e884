//! Workbook snapshot files.
//!
//! The snapshot is fetched once per render. Failures are returned to the
//! caller as-is; nothing here retries.

use super::{SourceError, Workbook};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A workbook snapshot stored on disk.
#[derive(Debug, Clone)]
pub struct SnapshotSource {
    path: PathBuf,
}

impl SnapshotSource {
    /// Create a source reading from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the snapshot.
    pub async fn fetch(&self) -> Result<Workbook, SourceError> {
        info!("Reading snapshot: {}", self.path.display());

        let content = tokio::fs::read_to_string(&self.path).await?;
        debug!("Snapshot size: {} bytes", content.len());

        let workbook = Workbook::from_json(&content)?;
        debug!(
            "Sheets: {}",
            workbook.sheet_names().collect::<Vec<_>>().join(", ")
        );

        Ok(workbook)
    }
}
