//! Property-based tests for the classification graph.
//!
//! These check invariants that must hold for any snapshot: node identity,
//! code normalization, edge symmetry, dual-key lookup and hierarchy
//! completeness.

use proptest::prelude::*;
use quantara_core::classification::{
    build_industry_hierarchy, BoardGraph, ClassificationFamily, ClassificationNode,
    ClassificationNodeType,
};
use quantara_core::snapshot::{BoardEntries, BoardEntry, BoardSnapshot, Membership};
use quantara_core::utils::normalize_instrument_code;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

// =============================================================================
// Generators
// =============================================================================

fn arb_node_type() -> impl Strategy<Value = ClassificationNodeType> {
    prop_oneof![
        Just(ClassificationNodeType::Instrument),
        Just(ClassificationNodeType::IndustryL1),
        Just(ClassificationNodeType::IndustryL2),
        Just(ClassificationNodeType::IndustryL3),
        Just(ClassificationNodeType::Concept),
        Just(ClassificationNodeType::Index),
    ]
}

/// Member lists drawn from a small code pool so boards share instruments.
fn arb_members() -> impl Strategy<Value = Vec<(String, String)>> {
    proptest::collection::vec(
        ("[0-9]{6}", "[A-Z][a-z]{2,6}").prop_map(|(code, name)| (code, name)),
        0..6,
    )
}

/// A snapshot with a handful of boards in every family.
fn arb_snapshot() -> impl Strategy<Value = BoardSnapshot> {
    (
        proptest::collection::vec(arb_members(), 1..4),
        proptest::collection::vec(arb_members(), 0..4),
        proptest::collection::vec(arb_members(), 0..4),
    )
        .prop_map(|(industries, concepts, indexes)| {
            let mut snapshot = BoardSnapshot::default();
            for (i, members) in industries.into_iter().enumerate() {
                snapshot.insert(
                    ClassificationFamily::Industry,
                    format!("IND{i:02}"),
                    BoardEntry::new(format!("Industry {i}"), ClassificationNodeType::IndustryL1)
                        .with_membership(Membership::from_pairs(members)),
                );
            }
            for (i, members) in concepts.into_iter().enumerate() {
                snapshot.insert(
                    ClassificationFamily::Concept,
                    format!("GN{i:02}"),
                    BoardEntry::new(format!("Concept {i}"), ClassificationNodeType::Concept)
                        .with_membership(Membership::from_pairs(members)),
                );
            }
            for (i, members) in indexes.into_iter().enumerate() {
                snapshot.insert(
                    ClassificationFamily::Index,
                    format!("IDX{i:02}"),
                    BoardEntry::new(format!("Index {i}"), ClassificationNodeType::Index)
                        .with_membership(Membership::from_pairs(members)),
                );
            }
            snapshot
        })
}

/// Industry entries with level-2/3 parents that may or may not exist.
fn arb_industry_entries() -> impl Strategy<Value = BoardEntries> {
    (
        1usize..5,
        proptest::collection::vec(0usize..8, 0..8),
        proptest::collection::vec(0usize..12, 0..10),
    )
        .prop_map(|(level1, level2_parents, level3_parents)| {
            let mut entries = BoardEntries::new();
            for i in 0..level1 {
                entries.insert(
                    format!("L1-{i}"),
                    BoardEntry::new(format!("Sector {i}"), ClassificationNodeType::IndustryL1),
                );
            }
            for (i, parent) in level2_parents.iter().enumerate() {
                entries.insert(
                    format!("L2-{i}"),
                    BoardEntry::new(format!("Group {i}"), ClassificationNodeType::IndustryL2)
                        .with_parent(format!("Sector {parent}")),
                );
            }
            for (i, parent) in level3_parents.iter().enumerate() {
                entries.insert(
                    format!("L3-{i}"),
                    BoardEntry::new(format!("Segment {i}"), ClassificationNodeType::IndustryL3)
                        .with_parent(format!("Group {parent}")),
                );
            }
            entries
        })
}

fn hash_of(node: &ClassificationNode) -> u64 {
    let mut hasher = DefaultHasher::new();
    node.hash(&mut hasher);
    hasher.finish()
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Equal (code, type) means equal and hash-equal, whatever the names.
    #[test]
    fn prop_identity_ignores_display_name(
        code in "[0-9A-Z]{2,8}",
        name_a in "\\PC{0,12}",
        name_b in "\\PC{0,12}",
        node_type in arb_node_type(),
    ) {
        let a = ClassificationNode::new(code.clone(), name_a, node_type);
        let b = ClassificationNode::new(code, name_b, node_type);
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(hash_of(&a), hash_of(&b));
    }

    /// A clean six-digit code passes through unchanged.
    #[test]
    fn prop_clean_code_unchanged(code in "[0-9]{6}") {
        prop_assert_eq!(normalize_instrument_code(&code), Some(code));
    }

    /// A six-digit code wrapped in letters yields exactly that run.
    #[test]
    fn prop_embedded_code_extracted(
        prefix in "[A-Za-z]{0,3}",
        code in "[0-9]{6}",
        suffix in "[A-Za-z.]{0,4}",
    ) {
        let raw = format!(" {prefix}{code}{suffix} ");
        prop_assert_eq!(normalize_instrument_code(&raw), Some(code));
    }

    /// Normalizing twice is the same as normalizing once.
    #[test]
    fn prop_normalization_idempotent(raw in "\\PC{0,16}") {
        if let Some(once) = normalize_instrument_code(&raw) {
            prop_assert_eq!(normalize_instrument_code(&once), Some(once.clone()));
        }
    }

    /// Every edge has a reverse edge with the same relation.
    #[test]
    fn prop_edges_are_symmetric(snapshot in arb_snapshot()) {
        let graph = BoardGraph::from_snapshot(snapshot);
        let edges = graph.edges();
        prop_assert_eq!(edges.len(), graph.stats().edges);
        for (board, instrument, relation) in edges {
            let reverse = graph.neighbors(instrument).expect("instrument row");
            prop_assert_eq!(reverse.get(board), Some(&relation));
            prop_assert!(relation.connects(board.node_type(), instrument.node_type()));
        }
    }

    /// Every board resolves to the same node by code and by name.
    #[test]
    fn prop_dual_key_round_trip(snapshot in arb_snapshot()) {
        let graph = BoardGraph::from_snapshot(snapshot.clone());
        for family in ClassificationFamily::ALL {
            for (code, entry) in snapshot.entries(family) {
                let by_code = graph.get_node(code, family);
                let by_name = graph.get_node(&entry.name, family);
                prop_assert!(by_code.is_some());
                prop_assert_eq!(by_code, by_name);
            }
        }
    }

    /// Querying a board returns exactly its distinct member codes.
    #[test]
    fn prop_members_round_trip(snapshot in arb_snapshot()) {
        let graph = BoardGraph::from_snapshot(snapshot.clone());
        for family in ClassificationFamily::ALL {
            for (code, entry) in snapshot.entries(family) {
                let mut expected: Vec<String> = match &entry.membership {
                    Some(Membership::Mapping(mapping)) => mapping.keys().cloned().collect(),
                    _ => Vec::new(),
                };
                expected.sort();
                expected.dedup();
                prop_assert_eq!(graph.instruments_by_classification(code, family), Some(expected));
            }
        }
    }

    /// Every industry board appears exactly once in the rebuilt tree.
    #[test]
    fn prop_hierarchy_complete(entries in arb_industry_entries()) {
        let tree = build_industry_hierarchy(&entries);
        prop_assert_eq!(tree.descendant_count(), entries.len());

        let mut seen: HashMap<&str, usize> = HashMap::new();
        for code in tree.codes() {
            *seen.entry(code).or_default() += 1;
        }
        prop_assert_eq!(seen.len(), entries.len());
        prop_assert!(seen.values().all(|count| *count == 1));

        // placed boards sit at the depth their level implies
        for level1 in tree.children.iter().filter(|node| !node.orphan) {
            prop_assert!(level1.code.as_deref().unwrap().starts_with("L1-"));
            for level2 in &level1.children {
                prop_assert!(level2.code.as_deref().unwrap().starts_with("L2-"));
                for level3 in &level2.children {
                    prop_assert!(level3.code.as_deref().unwrap().starts_with("L3-"));
                }
            }
        }
    }
}
