//! End-to-end scenarios: snapshot file on disk -> graph -> queries.

use quantara_core::classification::{
    BoardGraph, ClassificationFamily, ClassificationNodeType, InstrumentCodeQuery,
};
use quantara_core::snapshot::SnapshotLoader;
use quantara_core::{Error, GraphConfig};
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use ClassificationFamily::{Concept, Index, Industry};

// =============================================================================
// Fixtures
// =============================================================================

fn banking_snapshot() -> serde_json::Value {
    json!({
        "industry_info": {
            "BK01": {
                "name": "Banking",
                "type": 1,
                "parent_name": null,
                "cons": [{"股票代码": "000001", "股票简称": "PingAn"}]
            },
            "BK0101": {
                "name": "Retail Banking",
                "type": 2,
                "parent_name": "Banking",
                "cons": []
            },
            "BK0199": {
                "name": "Orphaned Lending",
                "type": 2,
                "parent_name": "Nonexistent"
            },
            "BK010101": {
                "name": "Card Services",
                "type": 3,
                "parent_name": "Retail Banking"
            },
            "BK019901": {
                "name": "Lost Leaf",
                "type": 3,
                "parent_name": "Missing Level Two"
            }
        },
        "concept_info": {
            "GN01": {
                "name": "Fintech",
                "type": 4,
                "cons": {"000001": {"name": "PingAn"}, "300059": {"name": "EastMoney"}},
                "tags": ["payments"]
            }
        },
        "index_info": {
            "000300": {
                "name": "CSI 300",
                "type": 5,
                "cons": {"600000": "SPDB"}
            }
        },
        "update_date": "2025-01-02",
        "update_datetime": "2025-01-02T08:00:00",
        "timestamp": 1735776000.0,
        "version": "1.0"
    })
}

fn write_snapshot(dir: &TempDir, snapshot: &serde_json::Value) -> PathBuf {
    let path = dir.path().join("board_info.json");
    fs::write(&path, serde_json::to_vec_pretty(snapshot).unwrap()).unwrap();
    path
}

fn load_graph(snapshot: &serde_json::Value) -> BoardGraph {
    let dir = TempDir::new().unwrap();
    write_snapshot(&dir, snapshot);
    BoardGraph::load(&GraphConfig::with_snapshot_dir(dir.path())).unwrap()
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn scenario_member_lookup_both_directions() {
    let graph = load_graph(&banking_snapshot());

    assert_eq!(
        graph.instruments_by_classification("Banking", Industry),
        Some(vec!["000001".to_string()])
    );

    let industries = graph
        .classifications_by_instrument("000001", Industry)
        .unwrap();
    let banking = graph.get_node("BK01", Industry).unwrap();
    assert!(industries.contains(banking));
    assert_eq!(banking.node_type(), ClassificationNodeType::IndustryL1);
    assert_eq!(graph.get_instrument_name("000001"), Some("PingAn"));
    assert_eq!(graph.get_instrument_code("PingAn"), Some("000001"));
}

#[test]
fn scenario_orphan_level2_is_top_level() {
    let graph = load_graph(&banking_snapshot());
    let tree = graph.hierarchy(Industry);

    let top_codes: Vec<&str> = tree
        .children
        .iter()
        .filter_map(|node| node.code.as_deref())
        .collect();
    assert_eq!(top_codes, vec!["BK01", "BK0199", "BK019901"]);

    let orphan = &tree.children[1];
    assert_eq!(orphan.name, "Orphaned Lending");
    assert!(orphan.orphan);
    assert!(orphan.children.is_empty());

    let banking = &tree.children[0];
    assert_eq!(banking.children.len(), 1);
    assert_eq!(banking.children[0].name, "Retail Banking");
    assert_eq!(banking.children[0].children[0].name, "Card Services");
    assert!(banking.find("BK0199").is_none());

    // five boards in, five boards out
    assert_eq!(tree.descendant_count(), 5);
}

#[test]
fn scenario_unknown_key_fails_whole_collection() {
    let graph = load_graph(&banking_snapshot());
    let query = InstrumentCodeQuery::new().with_keys(Industry, ["Banking", "Unknown"]);

    let err = graph.collect_instrument_codes(&query).unwrap_err();
    assert!(matches!(
        err,
        Error::KeyNotFound { family: Industry, ref key } if key == "Unknown"
    ));
    assert!(err.to_string().contains("Unknown"));
}

#[test]
fn scenario_families_do_not_cross_contaminate() {
    let graph = load_graph(&banking_snapshot());

    let industries = graph
        .classifications_by_instrument("000001", Industry)
        .unwrap();
    assert_eq!(industries.len(), 1);
    assert!(industries.iter().all(|node| node.node_type().is_industry()));

    let concepts = graph.classifications_by_instrument("000001", Concept).unwrap();
    assert_eq!(concepts.len(), 1);
    assert_eq!(concepts[0].code(), "GN01");

    assert_eq!(
        graph.classifications_by_instrument("000001", Index),
        Some(vec![])
    );
    assert_eq!(
        graph.instruments_by_classification("Fintech", Concept),
        Some(vec!["000001".to_string(), "300059".to_string()])
    );
    assert_eq!(graph.instruments_by_classification("Fintech", Industry), None);
}

#[test]
fn scenario_missing_snapshot_names_path() {
    let dir = TempDir::new().unwrap();
    let config = GraphConfig::with_snapshot_dir(dir.path());
    let expected = config.snapshot_path();

    let err = BoardGraph::load(&config).unwrap_err();
    match &err {
        Error::SnapshotNotFound { path } => assert_eq!(path, &expected),
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains(&expected.display().to_string()));
}

#[test]
fn scenario_corrupt_snapshot_is_fatal() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("board_info.json"), b"\x80\x04pickle").unwrap();

    let err = BoardGraph::load(&GraphConfig::with_snapshot_dir(dir.path())).unwrap_err();
    assert!(matches!(err, Error::SnapshotCorrupt { .. }));
}

#[test]
fn scenario_snapshot_info_and_metadata() {
    let dir = TempDir::new().unwrap();
    let path = write_snapshot(&dir, &banking_snapshot());

    let info = SnapshotLoader::new(&path).info().unwrap();
    assert_eq!(info.industry_count, 5);
    assert_eq!(info.concept_count, 1);
    assert_eq!(info.index_count, 1);
    assert_eq!(info.version, "1.0");

    let graph = BoardGraph::load(&GraphConfig::with_snapshot_path(&path)).unwrap();
    assert_eq!(graph.metadata().update_date, "2025-01-02");
    assert_eq!(graph.metadata().timestamp, Some(1735776000.0));
    assert!(graph.build_report().is_complete());
}

#[test]
fn scenario_broken_family_keeps_siblings() {
    let mut snapshot = banking_snapshot();
    snapshot["concept_info"]["GN02"] = json!({"name": "Bad", "type": 1, "cons": {}});

    let graph = load_graph(&snapshot);
    let report = graph.build_report();
    assert!(report.family(Concept).unwrap().error.is_some());
    assert!(report.family(Industry).unwrap().is_ok());
    assert!(report.family(Index).unwrap().is_ok());

    assert_eq!(graph.instruments_by_classification("Fintech", Concept), None);
    assert_eq!(
        graph.instruments_by_classification("Banking", Industry),
        Some(vec!["000001".to_string()])
    );
    assert_eq!(
        graph.instruments_by_classification("CSI 300", Index),
        Some(vec!["600000".to_string()])
    );
}
