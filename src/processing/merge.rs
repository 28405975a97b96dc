//! In-memory merge.
//!
//! Used when the whole `candidate -> publications` table fits in memory.
//! Produces the same records as the streaming [super::MergeTracker], sorted by canonical
//! identifier.
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::record::{FailedNormalization, NormalizationRecord};

/// Everything collapsed into a single canonical identifier.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Merged {
    pub originals: BTreeSet<String>,
    pub publications: BTreeSet<u64>,
}

/// Group candidates by canonical identifier, unioning their publications.
///
/// Candidates absent from `mapping` (failures) are left out.
pub fn merge_normalized(
    candidates: &BTreeMap<String, Vec<u64>>,
    mapping: &HashMap<String, String>,
) -> BTreeMap<String, Merged> {
    let mut merged: BTreeMap<String, Merged> = BTreeMap::new();
    for (candidate, publications) in candidates {
        if let Some(canonical) = mapping.get(candidate) {
            let entry = merged.entry(canonical.clone()).or_default();
            entry.originals.insert(candidate.clone());
            entry.publications.extend(publications.iter().copied());
        }
    }
    merged
}

/// Turn merged groups into records, sorted by canonical identifier.
pub fn to_records(merged: BTreeMap<String, Merged>) -> Vec<NormalizationRecord> {
    merged
        .into_iter()
        .map(|(curie, m)| NormalizationRecord::new(curie, m.originals, &m.publications))
        .collect()
}

/// Failure records, sorted by candidate.
pub fn failed_records(failed: &BTreeMap<String, Vec<u64>>) -> Vec<FailedNormalization> {
    failed
        .iter()
        .map(|(curie, pmids)| FailedNormalization::new(curie.clone(), pmids))
        .collect()
}
