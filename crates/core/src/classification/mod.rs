//! Classification module - the instrument/board graph, its derived trees and queries.
//!
//! Instruments are linked to boards of three families: a three-level industry
//! hierarchy, flat concept boards and flat index boards. Every board and
//! instrument is reachable by code and by display name.

mod board_graph;
mod graph_builder;
mod hierarchy;
mod node_model;


pub use board_graph::{BoardGraph, GraphStats, InstrumentCodeQuery};
pub use graph_builder::{BuildReport, FamilyReport};
pub use hierarchy::{build_flat_hierarchy, build_industry_hierarchy, HierarchyNode};
pub use node_model::{
    ClassificationFamily, ClassificationNode, ClassificationNodeType, NodeRecord, RelationType,
};
