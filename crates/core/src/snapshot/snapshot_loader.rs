//! Reads the board snapshot from disk.

use chrono::{DateTime, Utc};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::GraphConfig;
use crate::errors::{Error, Result};

use super::{BoardSnapshot, SnapshotInfo};

/// Loads a snapshot artifact. The loader only reads; producing and refreshing
/// the artifact belongs to the acquisition job.
#[derive(Debug, Clone)]
pub struct SnapshotLoader {
    path: PathBuf,
}

impl SnapshotLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(config: &GraphConfig) -> Self {
        Self::new(config.snapshot_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and deserializes the snapshot.
    ///
    /// Fails with [`Error::SnapshotNotFound`] when the artifact is absent and with
    /// [`Error::SnapshotIo`] / [`Error::SnapshotCorrupt`] when it cannot be read or
    /// parsed.
    pub fn load(&self) -> Result<BoardSnapshot> {
        let snapshot = self.read()?;

        info!("Loaded board snapshot from {}", self.path.display());
        info!(
            "Snapshot update date: {}, version: {}",
            snapshot.metadata.update_date, snapshot.metadata.version
        );
        info!(
            "Boards: {} industry, {} concept, {} index",
            snapshot.industry_info.len(),
            snapshot.concept_info.len(),
            snapshot.index_info.len()
        );

        Ok(snapshot)
    }

    /// Summarizes the artifact without building a graph.
    pub fn info(&self) -> Result<SnapshotInfo> {
        let snapshot = self.read()?;
        let file_meta = fs::metadata(&self.path).map_err(|source| Error::SnapshotIo {
            path: self.path.clone(),
            source,
        })?;
        let modified_time = file_meta.modified().ok().map(DateTime::<Utc>::from);

        Ok(SnapshotInfo {
            path: self.path.clone(),
            file_size: file_meta.len(),
            modified_time,
            update_date: snapshot.metadata.update_date,
            update_datetime: snapshot.metadata.update_datetime,
            version: snapshot.metadata.version,
            industry_count: snapshot.industry_info.len(),
            concept_count: snapshot.concept_info.len(),
            index_count: snapshot.index_info.len(),
        })
    }

    fn read(&self) -> Result<BoardSnapshot> {
        if !self.path.exists() {
            return Err(Error::SnapshotNotFound {
                path: self.path.clone(),
            });
        }

        let bytes = fs::read(&self.path).map_err(|source| Error::SnapshotIo {
            path: self.path.clone(),
            source,
        })?;
        debug!(
            "Read {} bytes of board snapshot from {}",
            bytes.len(),
            self.path.display()
        );

        serde_json::from_slice(&bytes).map_err(|source| Error::SnapshotCorrupt {
            path: self.path.clone(),
            source,
        })
    }
}
