//! Turns snapshot entries into indexed nodes and a symmetric adjacency map.
//!
//! Each family is first staged on its own. Only a family that stages cleanly is
//! merged into the graph, so a failing family contributes no nodes and no edges
//! while its siblings stay intact.

use log::{error, info, warn};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

use crate::constants::{
    CONCEPT_CODE_HEADERS, CONCEPT_NAME_HEADERS, INDUSTRY_CODE_HEADERS, INDUSTRY_NAME_HEADERS,
    INSTRUMENT_CODE_LEN,
};
use crate::errors::BuildError;
use crate::snapshot::{BoardEntries, BoardSnapshot, Membership};
use crate::utils::{normalize_instrument_code, value_to_text};

use super::{ClassificationFamily, ClassificationNode, ClassificationNodeType, RelationType};

/// Lookup table keyed by both code and display name.
pub(crate) type NodeIndex = HashMap<String, ClassificationNode>;

/// Node to its neighbors, each tagged with the relation joining them.
pub(crate) type Adjacency = HashMap<ClassificationNode, BTreeMap<ClassificationNode, RelationType>>;

/// Outcome of ingesting one family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyReport {
    pub family: ClassificationFamily,
    pub boards: usize,
    pub edges: usize,
    pub skipped_members: usize,
    pub error: Option<BuildError>,
}

impl FamilyReport {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Per-family outcome of a graph build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    families: Vec<FamilyReport>,
}

impl BuildReport {
    pub fn families(&self) -> &[FamilyReport] {
        &self.families
    }

    pub fn family(&self, family: ClassificationFamily) -> Option<&FamilyReport> {
        self.families.iter().find(|report| report.family == family)
    }

    pub fn failures(&self) -> impl Iterator<Item = &FamilyReport> {
        self.families.iter().filter(|report| !report.is_ok())
    }

    /// True when every family was merged.
    pub fn is_complete(&self) -> bool {
        self.families.iter().all(FamilyReport::is_ok)
    }
}

/// A member instrument read from a membership record.
#[derive(Debug, Clone)]
struct MemberRecord {
    code: String,
    name: String,
}

/// One family's boards and memberships, not yet merged.
#[derive(Debug)]
struct FamilyEdges {
    family: ClassificationFamily,
    boards: Vec<(ClassificationNode, Vec<MemberRecord>)>,
    skipped_members: usize,
}

/// Everything the graph value needs, produced by one build pass.
#[derive(Debug, Default)]
pub(crate) struct BuiltGraph {
    pub board_indices: [NodeIndex; 3],
    pub instrument_index: NodeIndex,
    pub instrument_code_to_name: HashMap<String, String>,
    pub instrument_name_to_code: HashMap<String, String>,
    pub adjacency: Adjacency,
    pub report: BuildReport,
}

#[derive(Debug, Default)]
pub(crate) struct GraphBuilder {
    graph: BuiltGraph,
}

impl GraphBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Runs the build pass over all three families.
    pub(crate) fn build(mut self, snapshot: &BoardSnapshot) -> BuiltGraph {
        for family in ClassificationFamily::ALL {
            let report = match stage_family(family, snapshot.entries(family)) {
                Ok(staged) => {
                    let boards = staged.boards.len();
                    let skipped_members = staged.skipped_members;
                    let edges = self.merge(staged);
                    info!(
                        "Built {} boards: {} boards, {} edges, {} skipped members",
                        family, boards, edges, skipped_members
                    );
                    FamilyReport {
                        family,
                        boards,
                        edges,
                        skipped_members,
                        error: None,
                    }
                }
                Err(err) => {
                    error!("Failed to build {} boards, family dropped: {}", family, err);
                    FamilyReport {
                        family,
                        boards: 0,
                        edges: 0,
                        skipped_members: 0,
                        error: Some(err),
                    }
                }
            };
            self.graph.report.families.push(report);
        }

        info!(
            "Board graph ready: {} nodes, {} instruments",
            self.graph.adjacency.len(),
            self.graph.instrument_code_to_name.len()
        );
        self.graph
    }

    fn merge(&mut self, staged: FamilyEdges) -> usize {
        let relation = staged.family.relation_type();
        let mut edges = 0;

        for (board, members) in staged.boards {
            let index = &mut self.graph.board_indices[staged.family.slot()];
            index.insert(board.code().to_string(), board.clone());
            index.insert(board.name().to_string(), board.clone());
            self.graph.adjacency.entry(board.clone()).or_default();

            for member in members {
                let instrument = self.register_instrument(member);
                if self.insert_edge(&board, &instrument, relation) {
                    edges += 1;
                }
            }
        }

        edges
    }

    /// Reuses the instrument node already registered under the code, or creates
    /// one. The code/name maps are last-write-wins.
    fn register_instrument(&mut self, member: MemberRecord) -> ClassificationNode {
        let existing = self
            .graph
            .instrument_index
            .get(&member.code)
            .filter(|node| node.code() == member.code)
            .cloned();
        let instrument = existing.unwrap_or_else(|| {
            ClassificationNode::new(
                member.code.clone(),
                member.name.clone(),
                ClassificationNodeType::Instrument,
            )
        });

        self.graph
            .instrument_index
            .insert(member.code.clone(), instrument.clone());
        if !member.name.is_empty() {
            self.graph
                .instrument_index
                .insert(member.name.clone(), instrument.clone());
            self.graph
                .instrument_code_to_name
                .insert(member.code.clone(), member.name.clone());
            self.graph
                .instrument_name_to_code
                .insert(member.name, member.code);
        }

        instrument
    }

    /// Inserts the edge in both directions. Returns false when the pair was
    /// already connected.
    fn insert_edge(
        &mut self,
        board: &ClassificationNode,
        instrument: &ClassificationNode,
        relation: RelationType,
    ) -> bool {
        let forward = self
            .graph
            .adjacency
            .entry(board.clone())
            .or_default()
            .insert(instrument.clone(), relation);
        self.graph
            .adjacency
            .entry(instrument.clone())
            .or_default()
            .insert(board.clone(), relation);
        forward.is_none()
    }
}

fn stage_family(
    family: ClassificationFamily,
    entries: &BoardEntries,
) -> Result<FamilyEdges, BuildError> {
    let mut staged = FamilyEdges {
        family,
        boards: Vec::with_capacity(entries.len()),
        skipped_members: 0,
    };

    for (code, entry) in entries {
        let node_type = ClassificationNodeType::from_int(entry.type_tag)?;
        if !family.accepts(node_type) {
            return Err(BuildError::UnexpectedNodeType {
                code: code.clone(),
                node_type,
                family,
            });
        }

        let board = ClassificationNode::new(code.clone(), entry.name.clone(), node_type);
        let members = match &entry.membership {
            Some(membership) => read_members(family, code, membership, &mut staged.skipped_members)?,
            None => Vec::new(),
        };
        staged.boards.push((board, members));
    }

    Ok(staged)
}

fn read_members(
    family: ClassificationFamily,
    board_code: &str,
    membership: &Membership,
    skipped: &mut usize,
) -> Result<Vec<MemberRecord>, BuildError> {
    let mut members = Vec::with_capacity(membership.len());

    match membership {
        Membership::Rows(rows) => {
            let Some((code_headers, name_headers)) = row_headers(family) else {
                warn!(
                    "Skipping {} tabular members of {} board '{}': only code-keyed membership is supported",
                    rows.len(),
                    family,
                    board_code
                );
                *skipped += rows.len();
                return Ok(members);
            };

            for row in rows {
                let raw_code = first_present(row, code_headers);
                let name = first_present(row, name_headers);
                match row_member_code(family, &raw_code) {
                    Some(code) => members.push(MemberRecord { code, name }),
                    None => *skipped += 1,
                }
            }
        }
        Membership::Mapping(mapping) => {
            for (raw_code, info) in mapping {
                let name = match info {
                    Value::Object(fields) => fields.get("name").map(value_to_text).unwrap_or_default(),
                    other => value_to_text(other),
                };
                match normalize_instrument_code(raw_code) {
                    Some(code) => members.push(MemberRecord { code, name }),
                    None => *skipped += 1,
                }
            }
        }
        Membership::Unrecognized(value) => {
            return Err(BuildError::MalformedMembership {
                code: board_code.to_string(),
                message: format!("expected rows or a code-keyed mapping, got {}", value),
            });
        }
    }

    Ok(members)
}

/// Header aliases for tabular membership. Index boards have none.
fn row_headers(family: ClassificationFamily) -> Option<(&'static [&'static str], &'static [&'static str])> {
    match family {
        ClassificationFamily::Industry => Some((INDUSTRY_CODE_HEADERS, INDUSTRY_NAME_HEADERS)),
        ClassificationFamily::Concept => Some((CONCEPT_CODE_HEADERS, CONCEPT_NAME_HEADERS)),
        ClassificationFamily::Index => None,
    }
}

/// Text of the first header present in the row, empty if none is.
fn first_present(row: &Map<String, Value>, headers: &[&str]) -> String {
    headers
        .iter()
        .find_map(|header| row.get(*header))
        .map(value_to_text)
        .unwrap_or_default()
}

/// Industry rows must carry at least a full-width code before normalization.
fn row_member_code(family: ClassificationFamily, raw_code: &str) -> Option<String> {
    if family == ClassificationFamily::Industry {
        if raw_code.chars().count() < INSTRUMENT_CODE_LEN {
            return None;
        }
        let head: String = raw_code.chars().take(INSTRUMENT_CODE_LEN).collect();
        return normalize_instrument_code(&head);
    }
    normalize_instrument_code(raw_code)
}
