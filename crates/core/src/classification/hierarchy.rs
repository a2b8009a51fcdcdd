//! Derived board trees.
//!
//! Industry boards form a three-level tree rebuilt from the flat `parent_name`
//! references in the snapshot. Concept and index boards are flat.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::snapshot::BoardEntries;

use super::{ClassificationFamily, ClassificationNodeType};

fn is_false(value: &bool) -> bool {
    !*value
}

/// A node of a derived board tree. The synthetic root carries no code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Set on entries promoted to the top level because their declared parent
    /// could not be found.
    #[serde(default, skip_serializing_if = "is_false")]
    pub orphan: bool,
    #[serde(default)]
    pub children: Vec<HierarchyNode>,
}

impl HierarchyNode {
    fn root(name: &str, children: Vec<HierarchyNode>) -> Self {
        Self {
            name: name.to_string(),
            code: None,
            orphan: false,
            children,
        }
    }

    fn board(name: &str, code: &str) -> Self {
        Self {
            name: name.to_string(),
            code: Some(code.to_string()),
            orphan: false,
            children: Vec::new(),
        }
    }

    fn promoted(name: &str, code: &str) -> Self {
        Self {
            orphan: true,
            ..Self::board(name, code)
        }
    }

    /// Number of board entries below this node, excluding the node itself.
    pub fn descendant_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| 1 + child.descendant_count())
            .sum()
    }

    /// Depth-first search for the entry with the given board code.
    pub fn find(&self, code: &str) -> Option<&HierarchyNode> {
        if self.code.as_deref() == Some(code) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(code))
    }

    /// Codes of every entry in the subtree, depth-first.
    pub fn codes(&self) -> Vec<&str> {
        let mut codes = Vec::new();
        self.collect_codes(&mut codes);
        codes
    }

    fn collect_codes<'a>(&'a self, codes: &mut Vec<&'a str>) {
        if let Some(code) = self.code.as_deref() {
            codes.push(code);
        }
        for child in &self.children {
            child.collect_codes(codes);
        }
    }
}

/// Rebuilds the industry tree.
///
/// Level-1 boards become top-level entries. A level-2 board is attached to the
/// first level-1 board whose name equals its `parent_name`; a level-3 board to
/// the first level-2 child (of any level-1 board) with a matching name. Boards
/// whose parent cannot be found are promoted to the top level and flagged as
/// orphans, after the level-1 boards. Every board with a level-1..3 tag appears
/// exactly once.
pub fn build_industry_hierarchy(entries: &BoardEntries) -> HierarchyNode {
    let mut level2 = Vec::new();
    let mut level3 = Vec::new();
    let mut top_level: Vec<HierarchyNode> = Vec::new();

    for (code, entry) in entries {
        match ClassificationNodeType::from_int(entry.type_tag) {
            Ok(ClassificationNodeType::IndustryL1) => {
                top_level.push(HierarchyNode::board(&entry.name, code));
            }
            Ok(ClassificationNodeType::IndustryL2) => level2.push((code, entry)),
            Ok(ClassificationNodeType::IndustryL3) => level3.push((code, entry)),
            Ok(other) => warn!(
                "Industry board '{}' has non-industry type {:?}, left out of the tree",
                code, other
            ),
            Err(err) => warn!("Industry board '{}' left out of the tree: {}", code, err),
        }
    }

    // Only genuine level-1 boards act as parents; promoted orphans never do.
    let level1_count = top_level.len();
    let mut orphans = Vec::new();

    for (code, entry) in level2 {
        let parent = match entry.parent_name.as_deref() {
            Some(parent_name) => top_level[..level1_count]
                .iter_mut()
                .find(|node| node.name == parent_name),
            None => None,
        };
        match parent {
            Some(parent) => parent.children.push(HierarchyNode::board(&entry.name, code)),
            None => {
                debug!(
                    "Level-2 industry '{}' ({}) has unknown parent {:?}, promoted to top level",
                    entry.name, code, entry.parent_name
                );
                orphans.push(HierarchyNode::promoted(&entry.name, code));
            }
        }
    }

    for (code, entry) in level3 {
        let parent = match entry.parent_name.as_deref() {
            Some(parent_name) => top_level[..level1_count]
                .iter_mut()
                .flat_map(|level1| level1.children.iter_mut())
                .find(|node| node.name == parent_name),
            None => None,
        };
        match parent {
            Some(parent) => parent.children.push(HierarchyNode::board(&entry.name, code)),
            None => {
                debug!(
                    "Level-3 industry '{}' ({}) has unknown parent {:?}, promoted to top level",
                    entry.name, code, entry.parent_name
                );
                orphans.push(HierarchyNode::promoted(&entry.name, code));
            }
        }
    }

    top_level.extend(orphans);
    HierarchyNode::root(ClassificationFamily::Industry.root_name(), top_level)
}

/// Builds a single-level tree of the family's boards under its synthetic root.
pub fn build_flat_hierarchy(family: ClassificationFamily, entries: &BoardEntries) -> HierarchyNode {
    let children = entries
        .iter()
        .map(|(code, entry)| HierarchyNode::board(&entry.name, code))
        .collect();
    HierarchyNode::root(family.root_name(), children)
}
