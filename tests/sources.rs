use std::io::Write;

use flate2::write::GzEncoder;
use flate2::Compression;
use rusqlite::{params, Connection};

use curie_clean::config::CleanerConfig;
use curie_clean::processing::Cleaner;
use curie_clean::sources::{OmniCorpSource, PubTatorSource, SqliteSource};

mod common;
use common::{init_logs, record, sorted_records, MockService};

#[test]
fn sqlite_table() {
    init_logs();
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("ngd.sqlite");
    let conn = Connection::open(&db).unwrap();
    conn.execute(
        "CREATE TABLE curie_to_pmids (curie TEXT PRIMARY KEY, pmids TEXT)",
        [],
    )
    .unwrap();
    for (curie, pmids) in [
        ("MESH:D014867", "[12345, 67890]"),
        ("CHEMBL.COMPOUND:CHEMBL1098659", "[11111, 22222]"),
        ("MONDO:0004976", "[33333]"),
        ("INVALID:FAKE123", "[99999]"),
        ("MESH:BROKEN", "12, 13"),
    ] {
        conn.execute(
            "INSERT INTO curie_to_pmids (curie, pmids) VALUES (?1, ?2)",
            params![curie, pmids],
        )
        .unwrap();
    }
    drop(conn);

    let service = MockService::new(&[
        ("MESH:D014867", "CHEBI:15377"),
        ("CHEMBL.COMPOUND:CHEMBL1098659", "CHEBI:15377"),
        ("MONDO:0004976", "MONDO:0004976"),
    ]);
    let out = dir.path().join("out");
    let config = CleanerConfig {
        chunk_size: 2,
        ..Default::default()
    };
    let mut source = SqliteSource::new(&db, config.chunk_size);
    let report = Cleaner::new("ngd", &out, config, &service)
        .run(&mut source)
        .unwrap();

    assert_eq!(report.stats.rows, 5);
    assert_eq!(report.stats.malformed, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(
        sorted_records(&out.join("ngd_cleaned.jsonl")),
        vec![
            record(
                "CHEBI:15377",
                &["CHEMBL.COMPOUND:CHEMBL1098659", "MESH:D014867"],
                &[11111, 12345, 22222, 67890]
            ),
            record("MONDO:0004976", &["MONDO:0004976"], &[33333]),
        ]
    );
    assert_eq!(
        std::fs::read_to_string(out.join("ngd_failed_normalizations.txt")).unwrap(),
        "INVALID:FAKE123\n"
    );
}

#[test]
fn pubtator_dump() {
    init_logs();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bioconcepts2pubtator3.gz");
    let mut enc = GzEncoder::new(std::fs::File::create(&path).unwrap(), Compression::default());
    enc.write_all(
        b"100\tSpecies\t4932\tyeast\tSR4GN\n\
          100\tChemical\t-\twater\tTaggerOne\n\
          101\tSpecies\t4932\tS. cerevisiae\tSR4GN\n\
          101\tChemical\tMESH:D014867\twater\tTaggerOne\n\
          102\tChemical\t15377\twater\tTaggerOne\n\
          102\tGene\t7157;7158\tp53\tGNormPlus\n",
    )
    .unwrap();
    enc.finish().unwrap();

    let service = MockService::new(&[
        ("NCBITaxon:4932", "NCBITaxon:4932"),
        ("MESH:D014867", "CHEBI:15377"),
        ("NCBIGene:7157", "NCBIGene:7157"),
        ("NCBIGene:7158", "NCBIGene:7157"),
    ]);
    let out = dir.path().join("out");
    let mut source = PubTatorSource::new(&path);
    let report = Cleaner::new("pubtator", &out, CleanerConfig::default(), &service)
        .run(&mut source)
        .unwrap();

    assert_eq!(report.incomplete, 0);
    assert_eq!(report.stats.invalid, 1);
    assert_eq!(
        sorted_records(&out.join("pubtator_cleaned.jsonl")),
        vec![
            record("CHEBI:15377", &["MESH:D014867"], &[101]),
            record("NCBIGene:7157", &["NCBIGene:7157", "NCBIGene:7158"], &[102]),
            record("NCBITaxon:4932", &["NCBITaxon:4932"], &[100, 101]),
        ]
    );
    assert_eq!(
        std::fs::read_to_string(out.join("pubtator_unknown_patterns.txt")).unwrap(),
        "UNKNOWN_CHEMICAL:15377\n"
    );
    assert_eq!(
        std::fs::read_to_string(out.join("pubtator_failed_normalizations.txt")).unwrap(),
        "UNKNOWN_CHEMICAL:15377\n"
    );
}

#[test]
fn omnicorp_directory() {
    init_logs();
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("omnicorp");
    std::fs::create_dir(&src).unwrap();
    std::fs::write(
        src.join("part_0.tsv"),
        "https://www.ncbi.nlm.nih.gov/pubmed/1\thttp://purl.obolibrary.org/obo/CHEBI_17822\n\
         https://www.ncbi.nlm.nih.gov/pubmed/2\thttp://id.nlm.nih.gov/mesh/D014346\n",
    )
    .unwrap();
    std::fs::write(
        src.join("part_1.tsv"),
        "https://www.ncbi.nlm.nih.gov/pubmed/3\thttp://purl.obolibrary.org/obo/CHEBI_17822\n\
         https://www.ncbi.nlm.nih.gov/pubmed/4\thttp://example.org/thing/1\n\
         not a pubmed url\thttp://purl.obolibrary.org/obo/CHEBI_17822\n",
    )
    .unwrap();

    let service = MockService::new(&[
        ("CHEBI:17822", "CHEBI:17822"),
        ("MESH:D014346", "CHEBI:17822"),
    ]);
    let out = dir.path().join("out");
    let mut source = OmniCorpSource::new(&src).unwrap();
    let report = Cleaner::new("omnicorp", &out, CleanerConfig::default(), &service)
        .run(&mut source)
        .unwrap();

    assert_eq!(report.stats.invalid, 1);
    assert_eq!(
        sorted_records(&out.join("omnicorp_cleaned.jsonl")),
        vec![record(
            "CHEBI:17822",
            &["CHEBI:17822", "MESH:D014346"],
            &[1, 2, 3]
        )]
    );
    assert_eq!(
        std::fs::read_to_string(out.join("omnicorp_unknown_patterns.txt")).unwrap(),
        "http://example.org/thing/1\n"
    );
}
