//! Snapshot module - the on-disk board capture and its loader.

mod snapshot_loader;
mod snapshot_model;


pub use snapshot_loader::SnapshotLoader;
pub use snapshot_model::{
    BoardEntries, BoardEntry, BoardSnapshot, Membership, SnapshotInfo, SnapshotMetadata,
};
