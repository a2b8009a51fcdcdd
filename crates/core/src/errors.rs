//! Core error types for the board classification graph.
//!
//! Construction errors (`SnapshotNotFound`, `SnapshotIo`, `SnapshotCorrupt`) are
//! fatal. [`BuildError`] is recovered inside the graph builder: the family that
//! produced it is dropped and the remaining families are kept.

use std::path::PathBuf;
use thiserror::Error;

use crate::classification::{ClassificationFamily, ClassificationNodeType};
use crate::constants::SNAPSHOT_REMEDIATION;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the classification graph.
#[derive(Error, Debug)]
pub enum Error {
    /// The snapshot artifact does not exist at the configured location.
    #[error(
        "Board snapshot not found: {}. Build it with the acquisition job first: {remedy}",
        .path.display(),
        remedy = SNAPSHOT_REMEDIATION
    )]
    SnapshotNotFound { path: PathBuf },

    /// The snapshot exists but could not be read.
    #[error("Board snapshot load error: cannot read {}: {source}", .path.display())]
    SnapshotIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The snapshot was read but is not a valid board snapshot.
    #[error(
        "Board snapshot load error: {} is corrupt: {source}. Regenerate it with: {remedy}",
        .path.display(),
        remedy = SNAPSHOT_REMEDIATION
    )]
    SnapshotCorrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A classification key did not resolve in an all-keys-must-resolve query.
    #[error("{family} board '{key}' not found")]
    KeyNotFound {
        family: ClassificationFamily,
        key: String,
    },

    #[error("Unsupported board family: {0}")]
    InvalidFamily(String),
}

/// Errors raised while ingesting one classification family.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("Invalid node type value: {0}")]
    InvalidNodeType(i64),

    #[error("Invalid relation type value: {0}")]
    InvalidRelationType(i64),

    #[error("Board '{code}' has node type {node_type:?}, which is not part of the {family} family")]
    UnexpectedNodeType {
        code: String,
        node_type: ClassificationNodeType,
        family: ClassificationFamily,
    },

    #[error("Board '{code}' has malformed membership: {message}")]
    MalformedMembership { code: String, message: String },
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
