//! Batched candidate normalization with failure tracking.
use std::collections::{BTreeMap, HashMap};

use itertools::Itertools;
use log::{debug, error, info, warn};

use crate::api::NormalizationService;

use super::TypeMetadata;

/// Number of unresolved candidates logged at warn level before falling back to debug.
const WARN_LIMIT: usize = 10;

/// Publications known for a candidate at normalization time.
///
/// Failures are publication-indexed: they keep whatever the caller knows.
/// Callers that only know candidates (e.g. a first pass over a source) can expose an empty slice.
pub trait KnownPublications {
    fn known_publications(&self) -> &[u64];
}

impl KnownPublications for Vec<u64> {
    fn known_publications(&self) -> &[u64] {
        self
    }
}

/// Drives a [NormalizationService], accumulating failures and type metadata.
///
/// A candidate is either in a returned mapping or in [Normalizer::failed], never both.
pub struct Normalizer<S> {
    service: S,
    failed: BTreeMap<String, Vec<u64>>,
    types: TypeMetadata,
    warned: usize,
}

impl<S: NormalizationService> Normalizer<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            failed: BTreeMap::new(),
            types: TypeMetadata::new(),
            warned: 0,
        }
    }

    fn unresolved(&mut self, candidate: &str, reason: &str) {
        if self.warned < WARN_LIMIT {
            warn!("{}: {}", reason, candidate);
        } else if self.warned == WARN_LIMIT {
            warn!("... (suppressing further unresolved candidates)");
        } else {
            debug!("{}: {}", reason, candidate);
        }
        self.warned += 1;
    }

    fn mark_failed<V: KnownPublications>(
        &mut self,
        candidate: &str,
        known: &BTreeMap<String, V>,
    ) {
        if let Some(pubs) = known.get(candidate) {
            self.failed
                .insert(candidate.to_string(), pubs.known_publications().to_vec());
        }
    }

    /// Normalize one batch in a single request.
    ///
    /// Candidates without a non-empty canonical identifier in the response are marked failed
    /// (if `known` has an entry for them). If the request itself fails, the whole batch is failed
    /// and an empty mapping is returned.
    pub fn normalize<V: KnownPublications>(
        &mut self,
        batch: &[String],
        known: &BTreeMap<String, V>,
    ) -> HashMap<String, String> {
        info!("Normalizing {} CURIEs", batch.len());

        let response = match self.service.lookup(batch) {
            Ok(r) => r,
            Err(e) => {
                error!("All API retry attempts failed for batch: {}", e);
                for candidate in batch {
                    self.mark_failed(candidate, known);
                }
                return HashMap::new();
            }
        };

        let mut mapping = HashMap::with_capacity(batch.len());
        for candidate in batch {
            match response.get(candidate) {
                Some(Some(node)) => match node.canonical() {
                    Some(canonical) => {
                        self.types.record(canonical, &node.types);
                        self.failed.remove(candidate);
                        mapping.insert(candidate.clone(), canonical.to_string());
                    }
                    None => {
                        self.unresolved(candidate, "No normalized identifier for");
                        self.mark_failed(candidate, known);
                    }
                },
                _ => {
                    self.unresolved(candidate, "CURIE not found in normalization response");
                    self.mark_failed(candidate, known);
                }
            }
        }
        mapping
    }

    /// Normalize every key of `candidates`, `batch_size` keys per request.
    ///
    /// Batches follow the key order of the map, and each candidate belongs to exactly one batch.
    pub fn normalize_in_batches<V: KnownPublications>(
        &mut self,
        candidates: &BTreeMap<String, V>,
        batch_size: usize,
    ) -> HashMap<String, String> {
        let batch_size = batch_size.max(1);
        let nb_batches = (candidates.len() + batch_size - 1) / batch_size;
        let mut mapping = HashMap::with_capacity(candidates.len());

        let batches = candidates.keys().cloned().chunks(batch_size);
        for (idx, batch) in batches.into_iter().enumerate() {
            let batch: Vec<String> = batch.collect();
            mapping.extend(self.normalize(&batch, candidates));
            info!("Processed batch {}/{}", idx + 1, nb_batches);
        }
        mapping
    }

    /// Failed candidates with the publications known for them.
    pub fn failed(&self) -> &BTreeMap<String, Vec<u64>> {
        &self.failed
    }

    /// Failed candidates, sorted.
    pub fn failed_curies(&self) -> Vec<&str> {
        self.failed.keys().map(String::as_str).collect()
    }

    pub fn clear_failed(&mut self) {
        self.failed.clear();
        self.warned = 0;
    }

    pub fn types(&self) -> &TypeMetadata {
        &self.types
    }

    pub fn clear_types(&mut self) {
        self.types.clear()
    }
}
