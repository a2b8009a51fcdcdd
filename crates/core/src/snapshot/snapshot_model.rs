//! Serde model of the board snapshot written by the acquisition job.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::classification::{ClassificationFamily, ClassificationNodeType};
use crate::constants::UNKNOWN_METADATA;

/// Board code to entry. Ordered by code, which fixes every iteration order
/// downstream.
pub type BoardEntries = BTreeMap<String, BoardEntry>;

/// Point-in-time capture of all three classification families.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardSnapshot {
    #[serde(default)]
    pub industry_info: BoardEntries,
    #[serde(default)]
    pub concept_info: BoardEntries,
    #[serde(default)]
    pub index_info: BoardEntries,
    #[serde(flatten)]
    pub metadata: SnapshotMetadata,
}

impl BoardSnapshot {
    pub fn entries(&self, family: ClassificationFamily) -> &BoardEntries {
        match family {
            ClassificationFamily::Industry => &self.industry_info,
            ClassificationFamily::Concept => &self.concept_info,
            ClassificationFamily::Index => &self.index_info,
        }
    }

    pub fn entries_mut(&mut self, family: ClassificationFamily) -> &mut BoardEntries {
        match family {
            ClassificationFamily::Industry => &mut self.industry_info,
            ClassificationFamily::Concept => &mut self.concept_info,
            ClassificationFamily::Index => &mut self.index_info,
        }
    }

    /// Adds an entry to a family, replacing any entry with the same code.
    pub fn insert(&mut self, family: ClassificationFamily, code: impl Into<String>, entry: BoardEntry) {
        self.entries_mut(family).insert(code.into(), entry);
    }
}

fn unknown() -> String {
    UNKNOWN_METADATA.to_string()
}

/// Producer-side bookkeeping stored next to the collections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    #[serde(default = "unknown")]
    pub update_date: String,
    #[serde(default = "unknown")]
    pub update_datetime: String,
    #[serde(default)]
    pub timestamp: Option<f64>,
    #[serde(default = "unknown")]
    pub version: String,
}

impl Default for SnapshotMetadata {
    fn default() -> Self {
        Self {
            update_date: unknown(),
            update_datetime: unknown(),
            timestamp: None,
            version: unknown(),
        }
    }
}

/// One classification board as captured by the producer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardEntry {
    pub name: String,
    /// Numeric node type tag, see [`ClassificationNodeType::from_int`].
    #[serde(rename = "type")]
    pub type_tag: i64,
    /// Declared parent board name (industry levels 2 and 3 only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_name: Option<String>,
    #[serde(default, alias = "cons", skip_serializing_if = "Option::is_none")]
    pub membership: Option<Membership>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl BoardEntry {
    pub fn new(name: impl Into<String>, node_type: ClassificationNodeType) -> Self {
        Self {
            name: name.into(),
            type_tag: i64::from(node_type.value()),
            parent_name: None,
            membership: None,
            tags: Vec::new(),
        }
    }

    pub fn with_parent(mut self, parent_name: impl Into<String>) -> Self {
        self.parent_name = Some(parent_name.into());
        self
    }

    pub fn with_membership(mut self, membership: Membership) -> Self {
        self.membership = Some(membership);
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }
}

/// Member instruments of a board.
///
/// The producer writes either tabular rows (one object per member, with
/// family-specific headers) or a mapping keyed by instrument code. Anything
/// else lands in `Unrecognized` and fails the family at build time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Membership {
    Rows(Vec<Map<String, Value>>),
    Mapping(Map<String, Value>),
    Unrecognized(Value),
}

impl Membership {
    /// Code-keyed mapping with `{"name": ...}` values.
    pub fn from_pairs<I, C, N>(members: I) -> Self
    where
        I: IntoIterator<Item = (C, N)>,
        C: Into<String>,
        N: Into<String>,
    {
        let mapping = members
            .into_iter()
            .map(|(code, name)| {
                let mut info = Map::new();
                info.insert("name".to_string(), Value::String(name.into()));
                (code.into(), Value::Object(info))
            })
            .collect();
        Membership::Mapping(mapping)
    }

    /// Tabular rows using the given code and name headers.
    pub fn from_rows<I, C, N>(code_header: &str, name_header: &str, members: I) -> Self
    where
        I: IntoIterator<Item = (C, N)>,
        C: Into<String>,
        N: Into<String>,
    {
        let rows = members
            .into_iter()
            .map(|(code, name)| {
                let mut row = Map::new();
                row.insert(code_header.to_string(), Value::String(code.into()));
                row.insert(name_header.to_string(), Value::String(name.into()));
                row
            })
            .collect();
        Membership::Rows(rows)
    }

    pub fn len(&self) -> usize {
        match self {
            Membership::Rows(rows) => rows.len(),
            Membership::Mapping(mapping) => mapping.len(),
            Membership::Unrecognized(_) => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// File-level facts about a snapshot, read without building a graph.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotInfo {
    pub path: PathBuf,
    pub file_size: u64,
    pub modified_time: Option<DateTime<Utc>>,
    pub update_date: String,
    pub update_datetime: String,
    pub version: String,
    pub industry_count: usize,
    pub concept_count: usize,
    pub index_count: usize,
}
