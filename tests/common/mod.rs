use std::cell::Cell;
use std::collections::HashMap;
use std::path::Path;

use curie_clean::api::{NormalizationService, NormalizedNode};
use curie_clean::error::Error;
use curie_clean::io::read_jsonl;
use curie_clean::record::NormalizationRecord;

pub fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Resolves candidates from a fixed table.
/// Batches containing `poison` fail as a whole.
pub struct MockService {
    table: HashMap<String, NormalizedNode>,
    pub poison: Option<String>,
    calls: Cell<usize>,
}

impl MockService {
    pub fn new(entries: &[(&str, &str)]) -> Self {
        Self::with_types(
            &entries
                .iter()
                .map(|(c, n)| (*c, *n, &[][..]))
                .collect::<Vec<_>>(),
        )
    }

    pub fn with_types(entries: &[(&str, &str, &[&str])]) -> Self {
        Self {
            table: entries
                .iter()
                .map(|(c, n, t)| (c.to_string(), NormalizedNode::new(n, t)))
                .collect(),
            poison: None,
            calls: Cell::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl NormalizationService for MockService {
    fn lookup(
        &self,
        candidates: &[String],
    ) -> Result<HashMap<String, Option<NormalizedNode>>, Error> {
        self.calls.set(self.calls.get() + 1);
        if let Some(p) = &self.poison {
            if candidates.contains(p) {
                return Err(Error::HttpStatus(503));
            }
        }
        Ok(candidates
            .iter()
            .map(|c| (c.clone(), self.table.get(c).cloned()))
            .collect())
    }
}

/// Records of a jsonl file, sorted by canonical identifier.
pub fn sorted_records(path: &Path) -> Vec<NormalizationRecord> {
    let mut records: Vec<NormalizationRecord> = read_jsonl(path).unwrap();
    records.sort_by(|a, b| a.curie.cmp(&b.curie));
    records
}

pub fn record(curie: &str, originals: &[&str], pmids: &[u64]) -> NormalizationRecord {
    NormalizationRecord {
        curie: curie.to_string(),
        original_curies: originals.iter().map(|s| s.to_string()).collect(),
        publications: pmids.iter().map(|p| format!("PMID:{}", p)).collect(),
    }
}
