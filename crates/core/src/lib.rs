//! Quantara Core - the instrument classification graph.
//!
//! This crate indexes how tradable instruments relate to industry, concept and
//! index boards. A graph is built once from the board snapshot written by the
//! acquisition job and is read-only afterwards.
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +------------------+     +------------------+
//! |  SnapshotLoader  | --> |   GraphBuilder   | --> |    BoardGraph    |
//! +------------------+     +------------------+     +------------------+
//!   board_info.json          nodes, dual-key          queries, derived
//!                            indices, edges           board trees
//! ```
//!
//! # Example
//!
//! ```
//! use quantara_core::classification::{BoardGraph, ClassificationFamily, ClassificationNodeType};
//! use quantara_core::snapshot::{BoardEntry, BoardSnapshot, Membership};
//!
//! let mut snapshot = BoardSnapshot::default();
//! snapshot.insert(
//!     ClassificationFamily::Industry,
//!     "BK01",
//!     BoardEntry::new("Banking", ClassificationNodeType::IndustryL1)
//!         .with_membership(Membership::from_pairs([("000001", "PingAn")])),
//! );
//!
//! let graph = BoardGraph::from_snapshot(snapshot);
//! assert_eq!(
//!     graph.instruments_by_classification("Banking", ClassificationFamily::Industry),
//!     Some(vec!["000001".to_string()])
//! );
//! ```

pub mod classification;
pub mod config;
pub mod constants;
pub mod errors;
pub mod snapshot;
pub mod utils;

pub use classification::{
    BoardGraph, ClassificationFamily, ClassificationNode, ClassificationNodeType,
    InstrumentCodeQuery, RelationType,
};
pub use config::GraphConfig;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
