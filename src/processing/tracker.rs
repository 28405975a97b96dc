//! Streaming merge.
//!
//! The tracker knows, from the first pass, which candidates map to each canonical identifier and
//! how many times each of them occurs in the source. During the second pass it accumulates
//! publications per canonical identifier and hands back a record as soon as every expected
//! occurrence has been observed. The state of a canonical identifier is dropped once emitted,
//! so memory is bounded by the number of canonical identifiers still in progress.
use std::collections::{BTreeMap, BTreeSet, HashMap};

use log::{debug, error, warn};

use crate::record::NormalizationRecord;
use crate::sources::Entry;

/// Number of late/over-observed entries logged at warn level.
const WARN_LIMIT: usize = 10;

/// What the first pass says about a canonical identifier.
#[derive(Debug)]
struct Expected {
    /// candidate -> number of occurrences in the source.
    originals: BTreeMap<String, u32>,
    total: u64,
}

/// Accumulator of a canonical identifier in progress.
#[derive(Debug, Default)]
struct Pending {
    seen: BTreeMap<String, u32>,
    remaining: u64,
    publications: BTreeSet<u64>,
}

/// State left at end of source.
#[derive(Debug, Default)]
pub struct Leftovers {
    /// Canonical identifiers partially observed, with what was observed.
    pub partial: Vec<NormalizationRecord>,
    /// Canonical identifiers never observed in the second pass.
    pub unseen: Vec<String>,
}

impl Leftovers {
    pub fn is_empty(&self) -> bool {
        self.partial.is_empty() && self.unseen.is_empty()
    }

    pub fn len(&self) -> usize {
        self.partial.len() + self.unseen.len()
    }
}

#[derive(Debug)]
pub struct MergeTracker {
    mapping: HashMap<String, String>,
    expected: HashMap<String, Expected>,
    pending: HashMap<String, Pending>,
    skipped: usize,
    unexpected: usize,
    emitted: usize,
}

impl MergeTracker {
    /// Build a tracker from the candidate -> canonical mapping and per-candidate occurrence counts.
    ///
    /// Candidates missing from `occurrences` are expected once.
    pub fn new(mapping: HashMap<String, String>, occurrences: &BTreeMap<String, u32>) -> Self {
        let mut expected: HashMap<String, Expected> = HashMap::new();
        for (candidate, canonical) in &mapping {
            let count = occurrences.get(candidate).copied().unwrap_or(1).max(1);
            let e = expected.entry(canonical.clone()).or_insert_with(|| Expected {
                originals: BTreeMap::new(),
                total: 0,
            });
            e.originals.insert(candidate.clone(), count);
            e.total += u64::from(count);
        }

        Self {
            mapping,
            expected,
            pending: HashMap::new(),
            skipped: 0,
            unexpected: 0,
            emitted: 0,
        }
    }

    fn unexpected(&mut self, candidate: &str, canonical: &str, reason: &str) {
        if self.unexpected < WARN_LIMIT {
            warn!("{} {} ({})", reason, candidate, canonical);
        } else if self.unexpected == WARN_LIMIT {
            warn!("... (suppressing further unexpected entries)");
        }
        self.unexpected += 1;
    }

    /// Account for one entry. Returns the record of its canonical identifier if it is now complete.
    pub fn observe(&mut self, entry: Entry) -> Option<NormalizationRecord> {
        let canonical = match self.mapping.get(&entry.candidate) {
            Some(c) => c.clone(),
            None => {
                debug!("Skipping unnormalized candidate {}", entry.candidate);
                self.skipped += 1;
                return None;
            }
        };

        let expected = match self.expected.get(&canonical) {
            Some(e) => e,
            None => {
                self.unexpected(&entry.candidate, &canonical, "Entry after emission of");
                return None;
            }
        };

        let pending = self
            .pending
            .entry(canonical.clone())
            .or_insert_with(|| Pending {
                remaining: expected.total,
                ..Default::default()
            });

        let limit = expected.originals.get(&entry.candidate).copied().unwrap_or(0);
        let seen = pending.seen.entry(entry.candidate.clone()).or_default();
        *seen += 1;
        let over = *seen > limit;
        if !over {
            pending.remaining -= 1;
        }
        pending.publications.extend(entry.publications);
        let complete = pending.remaining == 0;

        if over {
            self.unexpected(&entry.candidate, &canonical, "More occurrences than counted for");
        }
        if !complete {
            return None;
        }

        let pending = self.pending.remove(&canonical)?;
        let expected = self.expected.remove(&canonical)?;
        self.emitted += 1;
        Some(NormalizationRecord::new(
            canonical,
            expected.originals.into_keys().collect(),
            &pending.publications,
        ))
    }

    /// Canonical identifiers still in progress.
    pub fn in_progress(&self) -> usize {
        self.pending.len()
    }

    /// Entries whose candidate had no mapping.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// End of source: whatever was not emitted.
    ///
    /// Partial records are built from what was actually observed.
    pub fn finish(mut self) -> Leftovers {
        let mut leftovers = Leftovers::default();

        let mut partial: Vec<(String, Pending)> = self.pending.drain().collect();
        partial.sort_by(|a, b| a.0.cmp(&b.0));
        for (canonical, pending) in partial {
            if let Some(expected) = self.expected.remove(&canonical) {
                let missing: Vec<&String> = expected
                    .originals
                    .iter()
                    .filter(|(c, n)| pending.seen.get(*c).copied().unwrap_or(0) < **n)
                    .map(|(c, _)| c)
                    .collect();
                error!(
                    "Incomplete canonical identifier {}: {} occurrences missing, from {:?}",
                    canonical, pending.remaining, missing
                );
            }
            leftovers.partial.push(NormalizationRecord::new(
                canonical,
                pending.seen.into_keys().collect(),
                &pending.publications,
            ));
        }

        let mut unseen: Vec<String> = self.expected.into_keys().collect();
        unseen.sort();
        for canonical in &unseen {
            error!("Canonical identifier {} never observed in second pass", canonical);
        }
        leftovers.unseen = unseen;

        leftovers
    }
}
