use serde_json::json;

use curie_clean::api::NodeNormClient;
use curie_clean::config::{CleanerConfig, ClientConfig};
use curie_clean::processing::Cleaner;
use curie_clean::sources::{Entry, MemorySource};

mod common;
use common::{init_logs, record, sorted_records};

#[test]
fn clean_against_node_normalizer() {
    init_logs();
    let mut server = mockito::Server::new();
    let m = server
        .mock("POST", "/get_normalized_nodes")
        .match_body(mockito::Matcher::PartialJson(json!({
            "conflate": true,
            "drug_chemical_conflate": true
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "MESH:D014867": {
                    "id": {"identifier": "CHEBI:15377", "label": "Water"},
                    "type": ["biolink:SmallMolecule", "biolink:ChemicalEntity"]
                },
                "CHEMBL.COMPOUND:CHEMBL1098659": {
                    "id": {"identifier": "CHEBI:15377", "label": "Water"},
                    "type": ["biolink:SmallMolecule", "biolink:ChemicalEntity"]
                },
                "MONDO:0004976": {
                    "id": {"identifier": "MONDO:0004976"},
                    "type": ["biolink:Disease"]
                },
                "INVALID:FAKE123": null
            })
            .to_string(),
        )
        .create();

    let dir = tempfile::tempdir().unwrap();
    let client = NodeNormClient::new(&ClientConfig {
        max_retries: 1,
        ..ClientConfig::with_endpoint(&format!("{}/get_normalized_nodes", server.url()))
    })
    .unwrap();
    let mut source = MemorySource::new(vec![
        Entry::new("MESH:D014867", &[12345, 67890]),
        Entry::new("CHEMBL.COMPOUND:CHEMBL1098659", &[11111]),
        Entry::new("MONDO:0004976", &[33333, 44444]),
        Entry::new("INVALID:FAKE123", &[99999]),
    ]);

    let report = Cleaner::new("ngd", dir.path(), CleanerConfig::default(), client)
        .run(&mut source)
        .unwrap();
    m.assert();

    assert_eq!(report.failed, 1);
    assert_eq!(
        sorted_records(&dir.path().join("ngd_cleaned.jsonl")),
        vec![
            record(
                "CHEBI:15377",
                &["CHEMBL.COMPOUND:CHEMBL1098659", "MESH:D014867"],
                &[11111, 12345, 67890]
            ),
            record("MONDO:0004976", &["MONDO:0004976"], &[33333, 44444]),
        ]
    );

    let types: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join("ngd_biolink_classes.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(types["total_normalized_curies"], 2);
    assert_eq!(types["class_distribution"]["biolink:SmallMolecule"], 1);
}
