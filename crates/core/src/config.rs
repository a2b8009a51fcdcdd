//! Construction settings for the board graph.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_SNAPSHOT_DIR, SNAPSHOT_FILE_NAME};

/// Where to find the board snapshot.
///
/// The default points at the directory the acquisition job writes to. Embedding
/// applications can deserialize this from their own settings file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphConfig {
    pub snapshot_dir: PathBuf,
    pub snapshot_file_name: String,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            snapshot_dir: PathBuf::from(DEFAULT_SNAPSHOT_DIR),
            snapshot_file_name: SNAPSHOT_FILE_NAME.to_string(),
        }
    }
}

impl GraphConfig {
    /// Keep the default file name but look for it in `dir`.
    pub fn with_snapshot_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            snapshot_dir: dir.into(),
            ..Self::default()
        }
    }

    /// Point at an explicit snapshot file.
    pub fn with_snapshot_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let snapshot_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let snapshot_file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| SNAPSHOT_FILE_NAME.to_string());
        Self {
            snapshot_dir,
            snapshot_file_name,
        }
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.snapshot_dir.join(&self.snapshot_file_name)
    }
}
