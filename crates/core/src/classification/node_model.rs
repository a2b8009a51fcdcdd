//! Domain models for classification graph nodes and relations.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::constants::{CONCEPT_ROOT, INDEX_ROOT, INDUSTRY_ROOT};
use crate::errors::{BuildError, Error};

/// Kind of entity a graph node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClassificationNodeType {
    Instrument,
    IndustryL1,
    IndustryL2,
    IndustryL3,
    Concept,
    Index,
}

impl ClassificationNodeType {
    const ALL: [ClassificationNodeType; 6] = [
        ClassificationNodeType::Instrument,
        ClassificationNodeType::IndustryL1,
        ClassificationNodeType::IndustryL2,
        ClassificationNodeType::IndustryL3,
        ClassificationNodeType::Concept,
        ClassificationNodeType::Index,
    ];

    const INDUSTRY: [ClassificationNodeType; 3] = [
        ClassificationNodeType::IndustryL1,
        ClassificationNodeType::IndustryL2,
        ClassificationNodeType::IndustryL3,
    ];

    const BOARD: [ClassificationNodeType; 2] =
        [ClassificationNodeType::Concept, ClassificationNodeType::Index];

    const CONCEPT: [ClassificationNodeType; 1] = [ClassificationNodeType::Concept];

    const INDEX: [ClassificationNodeType; 1] = [ClassificationNodeType::Index];

    /// Parses the numeric type tag used by the snapshot.
    pub fn from_int(value: i64) -> Result<Self, BuildError> {
        Self::ALL
            .into_iter()
            .find(|node_type| i64::from(node_type.value()) == value)
            .ok_or(BuildError::InvalidNodeType(value))
    }

    pub fn value(self) -> u8 {
        match self {
            ClassificationNodeType::Instrument => 0,
            ClassificationNodeType::IndustryL1 => 1,
            ClassificationNodeType::IndustryL2 => 2,
            ClassificationNodeType::IndustryL3 => 3,
            ClassificationNodeType::Concept => 4,
            ClassificationNodeType::Index => 5,
        }
    }

    /// Short machine tag.
    pub fn short_name(self) -> &'static str {
        match self {
            ClassificationNodeType::Instrument => "STOCK",
            ClassificationNodeType::IndustryL1 => "IND_L1",
            ClassificationNodeType::IndustryL2 => "IND_L2",
            ClassificationNodeType::IndustryL3 => "IND_L3",
            ClassificationNodeType::Concept => "CONCEPT",
            ClassificationNodeType::Index => "INDEX",
        }
    }

    /// Human readable label.
    pub fn label(self) -> &'static str {
        match self {
            ClassificationNodeType::Instrument => "Instrument",
            ClassificationNodeType::IndustryL1 => "Level-1 Industry",
            ClassificationNodeType::IndustryL2 => "Level-2 Industry",
            ClassificationNodeType::IndustryL3 => "Level-3 Industry",
            ClassificationNodeType::Concept => "Concept Board",
            ClassificationNodeType::Index => "Index Board",
        }
    }

    pub fn all() -> &'static [ClassificationNodeType] {
        &Self::ALL
    }

    pub fn industry_types() -> &'static [ClassificationNodeType] {
        &Self::INDUSTRY
    }

    /// Flat board types (concept and index).
    pub fn board_types() -> &'static [ClassificationNodeType] {
        &Self::BOARD
    }

    pub fn is_industry(self) -> bool {
        Self::INDUSTRY.contains(&self)
    }
}

impl fmt::Display for ClassificationNodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Edge tag naming the classification family an edge belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationType {
    IndustryRelation,
    ConceptRelation,
    IndexRelation,
}

impl RelationType {
    const ALL: [RelationType; 3] = [
        RelationType::IndustryRelation,
        RelationType::ConceptRelation,
        RelationType::IndexRelation,
    ];

    pub fn from_int(value: i64) -> Result<Self, BuildError> {
        Self::ALL
            .into_iter()
            .find(|relation| i64::from(relation.value()) == value)
            .ok_or(BuildError::InvalidRelationType(value))
    }

    pub fn value(self) -> u8 {
        match self {
            RelationType::IndustryRelation => 1,
            RelationType::ConceptRelation => 2,
            RelationType::IndexRelation => 3,
        }
    }

    pub fn short_name(self) -> &'static str {
        match self {
            RelationType::IndustryRelation => "IND_REL",
            RelationType::ConceptRelation => "CON_REL",
            RelationType::IndexRelation => "IDX_REL",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RelationType::IndustryRelation => "Industry Relation",
            RelationType::ConceptRelation => "Concept Relation",
            RelationType::IndexRelation => "Index Relation",
        }
    }

    pub fn all() -> &'static [RelationType] {
        &Self::ALL
    }

    /// Classification node types this relation attaches to an instrument.
    pub fn related_node_types(self) -> &'static [ClassificationNodeType] {
        self.family().node_types()
    }

    pub fn family(self) -> ClassificationFamily {
        match self {
            RelationType::IndustryRelation => ClassificationFamily::Industry,
            RelationType::ConceptRelation => ClassificationFamily::Concept,
            RelationType::IndexRelation => ClassificationFamily::Index,
        }
    }

    /// Whether an edge of this relation may join nodes of types `a` and `b`.
    ///
    /// One end must be an instrument and the other a node of the relation's family.
    pub fn connects(self, a: ClassificationNodeType, b: ClassificationNodeType) -> bool {
        let related = self.related_node_types();
        (a == ClassificationNodeType::Instrument && related.contains(&b))
            || (b == ClassificationNodeType::Instrument && related.contains(&a))
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One of the three taxonomy families an instrument can be classified under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassificationFamily {
    Industry,
    Concept,
    Index,
}

impl ClassificationFamily {
    pub const ALL: [ClassificationFamily; 3] = [
        ClassificationFamily::Industry,
        ClassificationFamily::Concept,
        ClassificationFamily::Index,
    ];

    pub fn relation_type(self) -> RelationType {
        match self {
            ClassificationFamily::Industry => RelationType::IndustryRelation,
            ClassificationFamily::Concept => RelationType::ConceptRelation,
            ClassificationFamily::Index => RelationType::IndexRelation,
        }
    }

    pub fn node_types(self) -> &'static [ClassificationNodeType] {
        match self {
            ClassificationFamily::Industry => ClassificationNodeType::industry_types(),
            ClassificationFamily::Concept => &ClassificationNodeType::CONCEPT,
            ClassificationFamily::Index => &ClassificationNodeType::INDEX,
        }
    }

    pub fn accepts(self, node_type: ClassificationNodeType) -> bool {
        self.node_types().contains(&node_type)
    }

    /// Name of the synthetic root of the family's derived tree.
    pub fn root_name(self) -> &'static str {
        match self {
            ClassificationFamily::Industry => INDUSTRY_ROOT,
            ClassificationFamily::Concept => CONCEPT_ROOT,
            ClassificationFamily::Index => INDEX_ROOT,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ClassificationFamily::Industry => "industry",
            ClassificationFamily::Concept => "concept",
            ClassificationFamily::Index => "index",
        }
    }

    /// Position in per-family lookup tables.
    pub(crate) fn slot(self) -> usize {
        match self {
            ClassificationFamily::Industry => 0,
            ClassificationFamily::Concept => 1,
            ClassificationFamily::Index => 2,
        }
    }
}

impl fmt::Display for ClassificationFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClassificationFamily {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "industry" => Ok(ClassificationFamily::Industry),
            "concept" => Ok(ClassificationFamily::Concept),
            "index" => Ok(ClassificationFamily::Index),
            _ => Err(Error::InvalidFamily(s.to_string())),
        }
    }
}

/// A node of the classification graph: an instrument or a classification board.
///
/// Identity is `(code, node_type)`. The display name is carried along but takes
/// no part in equality, hashing or ordering, since names collide across codes.
#[derive(Debug, Clone)]
pub struct ClassificationNode {
    code: String,
    name: String,
    node_type: ClassificationNodeType,
}

impl ClassificationNode {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        node_type: ClassificationNodeType,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            node_type,
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn node_type(&self) -> ClassificationNodeType {
        self.node_type
    }

    pub fn is_instrument(&self) -> bool {
        self.node_type == ClassificationNodeType::Instrument
    }

    pub fn to_record(&self) -> NodeRecord {
        NodeRecord {
            code: self.code.clone(),
            name: self.name.clone(),
            node_type: self.node_type.value(),
            type_name: self.node_type.label().to_string(),
            type_short: self.node_type.short_name().to_string(),
        }
    }
}

impl PartialEq for ClassificationNode {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code && self.node_type == other.node_type
    }
}

impl Eq for ClassificationNode {}

impl Hash for ClassificationNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
        self.node_type.hash(state);
    }
}

impl Ord for ClassificationNode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.code
            .cmp(&other.code)
            .then(self.node_type.cmp(&other.node_type))
    }
}

impl PartialOrd for ClassificationNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ClassificationNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({}, {})",
            self.node_type.short_name(),
            self.code,
            self.name
        )
    }
}

/// Plain serializable view of a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NodeRecord {
    pub code: String,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: u8,
    pub type_name: String,
    pub type_short: String,
}
