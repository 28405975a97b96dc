//! Persisted record shapes.
//!
//! These are the contract with downstream consumers: one JSON object per line,
//! identifiers and publications sorted, publications prefixed with `PMID:`.
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Prefix of every serialized publication reference.
pub const PMID_PREFIX: &str = "PMID:";

/// Serialize a publication id.
pub fn pmid_curie(pmid: u64) -> String {
    format!("{}{}", PMID_PREFIX, pmid)
}

/// Final unit of output: a canonical identifier with the candidates that collapsed into it
/// and the union of their publications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationRecord {
    pub curie: String,
    pub original_curies: Vec<String>,
    pub publications: Vec<String>,
}

impl NormalizationRecord {
    /// Build a record from sets, which enforces the sorted/deduplicated invariant.
    pub fn new(curie: String, originals: BTreeSet<String>, pmids: &BTreeSet<u64>) -> Self {
        Self {
            curie,
            original_curies: originals.into_iter().collect(),
            publications: pmids.iter().copied().map(pmid_curie).collect(),
        }
    }
}

/// A candidate the service could not resolve, with the publications known for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedNormalization {
    pub curie: String,
    pub publications: Vec<String>,
}

impl FailedNormalization {
    pub fn new(curie: String, pmids: &[u64]) -> Self {
        let pmids: BTreeSet<u64> = pmids.iter().copied().collect();
        Self {
            curie,
            publications: pmids.into_iter().map(pmid_curie).collect(),
        }
    }
}
