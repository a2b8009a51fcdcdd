//! The immutable board graph and its query layer.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::config::GraphConfig;
use crate::errors::{Error, Result};
use crate::snapshot::{BoardSnapshot, SnapshotLoader, SnapshotMetadata};

use super::graph_builder::{Adjacency, BuildReport, BuiltGraph, GraphBuilder, NodeIndex};
use super::hierarchy::{build_flat_hierarchy, build_industry_hierarchy, HierarchyNode};
use super::{ClassificationFamily, ClassificationNode, ClassificationNodeType, RelationType};

/// Keys for [`BoardGraph::collect_instrument_codes`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstrumentCodeQuery {
    pub industry_keys: Vec<String>,
    pub concept_keys: Vec<String>,
    pub index_keys: Vec<String>,
    pub instrument_codes: Vec<String>,
}

impl InstrumentCodeQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keys<I, S>(mut self, family: ClassificationFamily, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let target = match family {
            ClassificationFamily::Industry => &mut self.industry_keys,
            ClassificationFamily::Concept => &mut self.concept_keys,
            ClassificationFamily::Index => &mut self.index_keys,
        };
        target.extend(keys.into_iter().map(Into::into));
        self
    }

    pub fn with_instrument_codes<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.instrument_codes
            .extend(codes.into_iter().map(Into::into));
        self
    }

    fn keys(&self, family: ClassificationFamily) -> &[String] {
        match family {
            ClassificationFamily::Industry => &self.industry_keys,
            ClassificationFamily::Concept => &self.concept_keys,
            ClassificationFamily::Index => &self.index_keys,
        }
    }
}

/// Node and edge counts of a built graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStats {
    pub instruments: usize,
    pub industries: usize,
    pub concepts: usize,
    pub indexes: usize,
    /// Undirected edges; each is stored once per direction.
    pub edges: usize,
}

/// Relationships between instruments and industry, concept and index boards.
///
/// Built once from a snapshot and read-only afterwards. Share it behind an
/// `Arc` and swap the `Arc` to refresh; there is no in-place rebuild.
#[derive(Debug)]
pub struct BoardGraph {
    metadata: SnapshotMetadata,
    board_indices: [NodeIndex; 3],
    instrument_index: NodeIndex,
    instrument_code_to_name: HashMap<String, String>,
    instrument_name_to_code: HashMap<String, String>,
    adjacency: Adjacency,
    hierarchies: [HierarchyNode; 3],
    report: BuildReport,
}

impl BoardGraph {
    /// Loads the snapshot named by `config` and builds the graph.
    pub fn load(config: &GraphConfig) -> Result<Self> {
        let snapshot = SnapshotLoader::from_config(config).load()?;
        Ok(Self::from_snapshot(snapshot))
    }

    /// Builds the graph from a snapshot already in memory.
    pub fn from_snapshot(snapshot: BoardSnapshot) -> Self {
        let BuiltGraph {
            board_indices,
            instrument_index,
            instrument_code_to_name,
            instrument_name_to_code,
            adjacency,
            report,
        } = GraphBuilder::new().build(&snapshot);

        let hierarchies = [
            build_industry_hierarchy(&snapshot.industry_info),
            build_flat_hierarchy(ClassificationFamily::Concept, &snapshot.concept_info),
            build_flat_hierarchy(ClassificationFamily::Index, &snapshot.index_info),
        ];

        Self {
            metadata: snapshot.metadata,
            board_indices,
            instrument_index,
            instrument_code_to_name,
            instrument_name_to_code,
            adjacency,
            hierarchies,
            report,
        }
    }

    pub fn metadata(&self) -> &SnapshotMetadata {
        &self.metadata
    }

    /// Per-family outcome of the build, including families that were dropped.
    pub fn build_report(&self) -> &BuildReport {
        &self.report
    }

    /// Derived tree of a family under its synthetic root.
    pub fn hierarchy(&self, family: ClassificationFamily) -> &HierarchyNode {
        &self.hierarchies[family.slot()]
    }

    // ==================== Advisory lookups ====================

    /// Board of `family` registered under `key` (code or name).
    pub fn get_node(&self, key: &str, family: ClassificationFamily) -> Option<&ClassificationNode> {
        self.board_indices[family.slot()].get(key)
    }

    /// Instrument registered under `key` (code or name).
    pub fn get_instrument(&self, key: &str) -> Option<&ClassificationNode> {
        self.instrument_index.get(key)
    }

    pub fn get_instrument_name(&self, code: &str) -> Option<&str> {
        self.instrument_code_to_name.get(code).map(String::as_str)
    }

    /// Code last recorded for `name`. Names are not unique across codes.
    pub fn get_instrument_code(&self, name: &str) -> Option<&str> {
        self.instrument_name_to_code.get(name).map(String::as_str)
    }

    /// Adjacency row of a node.
    pub fn neighbors(
        &self,
        node: &ClassificationNode,
    ) -> Option<&BTreeMap<ClassificationNode, RelationType>> {
        self.adjacency.get(node)
    }

    // ==================== Traversal ====================

    /// Member instrument codes of the board `key` resolves to in `family`.
    ///
    /// Returns `None` when the key does not resolve, and an empty list when the
    /// board exists but has no members.
    pub fn instruments_by_classification(
        &self,
        key: &str,
        family: ClassificationFamily,
    ) -> Option<Vec<String>> {
        let board = self.get_node(key, family)?;
        let relation = family.relation_type();
        let codes = self
            .neighbors(board)
            .into_iter()
            .flatten()
            .filter(|(node, edge)| **edge == relation && node.is_instrument())
            .map(|(node, _)| node.code().to_string())
            .collect();
        Some(codes)
    }

    /// Boards of `family` the instrument `key` (code or name) belongs to.
    ///
    /// Returns `None` when the instrument is unknown.
    pub fn classifications_by_instrument(
        &self,
        key: &str,
        family: ClassificationFamily,
    ) -> Option<Vec<ClassificationNode>> {
        let instrument = self.get_instrument(key)?;
        let relation = family.relation_type();
        let boards = self
            .neighbors(instrument)
            .into_iter()
            .flatten()
            .filter(|(node, edge)| **edge == relation && family.accepts(node.node_type()))
            .map(|(node, _)| node.clone())
            .collect();
        Some(boards)
    }

    /// Union of the members of every listed board plus the explicit codes.
    ///
    /// Every key must resolve: the first key that does not fails the whole call
    /// with [`Error::KeyNotFound`]. Industry keys are checked first, then concept,
    /// then index keys. The result is de-duplicated and sorted.
    pub fn collect_instrument_codes(&self, query: &InstrumentCodeQuery) -> Result<Vec<String>> {
        let mut codes = BTreeSet::new();

        for family in ClassificationFamily::ALL {
            for key in query.keys(family) {
                let members = self.instruments_by_classification(key, family).ok_or_else(|| {
                    Error::KeyNotFound {
                        family,
                        key: key.clone(),
                    }
                })?;
                codes.extend(members);
            }
        }

        codes.extend(query.instrument_codes.iter().cloned());
        Ok(codes.into_iter().collect())
    }

    // ==================== Diagnostics ====================

    pub fn stats(&self) -> GraphStats {
        let mut stats = GraphStats::default();
        let mut directed_edges = 0;

        for (node, row) in &self.adjacency {
            directed_edges += row.len();
            match node.node_type() {
                ClassificationNodeType::Instrument => stats.instruments += 1,
                ClassificationNodeType::IndustryL1
                | ClassificationNodeType::IndustryL2
                | ClassificationNodeType::IndustryL3 => stats.industries += 1,
                ClassificationNodeType::Concept => stats.concepts += 1,
                ClassificationNodeType::Index => stats.indexes += 1,
            }
        }

        stats.edges = directed_edges / 2;
        stats
    }

    /// Every edge as `(board, instrument, relation)`, boards in code order.
    pub fn edges(&self) -> Vec<(&ClassificationNode, &ClassificationNode, RelationType)> {
        let mut edges: Vec<_> = self
            .adjacency
            .iter()
            .filter(|(node, _)| !node.is_instrument())
            .flat_map(|(board, row)| row.iter().map(move |(member, edge)| (board, member, *edge)))
            .collect();
        edges.sort_by(|a, b| a.0.cmp(b.0).then(a.1.cmp(b.1)));
        edges
    }
}
