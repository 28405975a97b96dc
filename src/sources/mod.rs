/*! Sources

A source is scanned (possibly several times) and yields [Entry]s: one candidate identifier
with the publications a row associates to it. Every pass over a source goes through the same
[Source::scan], so that extraction rules cannot diverge between passes.

Malformed rows are counted and skipped, never fatal.
!*/
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use log::{debug, info, warn};

use crate::error::Error;

mod memory;
mod omnicorp;
mod pubtator;
mod sqlite;

pub use memory::MemorySource;
pub use omnicorp::OmniCorpSource;
pub use pubtator::PubTatorSource;
pub use sqlite::SqliteSource;

/// One candidate identifier and its publications, as found in a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub candidate: String,
    pub publications: Vec<u64>,
}

impl Entry {
    pub fn new(candidate: &str, publications: &[u64]) -> Self {
        Self {
            candidate: candidate.to_string(),
            publications: publications.to_vec(),
        }
    }
}

/// Malformed rows logged at warn level per scan.
const WARN_LIMIT: usize = 10;

/// Counters of a single scan.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanStats {
    /// rows (or lines) read.
    pub rows: usize,
    /// entries handed to the visitor.
    pub entries: usize,
    /// rows skipped because of their shape (field count, pmid, list literal...).
    pub malformed: usize,
    /// values that yielded no candidate (sentinels, blank ids, urls without pmid).
    pub invalid: usize,
    /// construction rule histogram, for sources that build candidates.
    pub constructions: BTreeMap<String, usize>,
}

impl ScanStats {
    /// Count a skipped row. The first few of a scan are logged as warnings.
    pub fn skip_malformed(&mut self, reason: fmt::Arguments) {
        if self.malformed < WARN_LIMIT {
            warn!("Skipping malformed row: {}", reason);
        } else {
            if self.malformed == WARN_LIMIT {
                warn!("... (suppressing further malformed row warnings)");
            }
            debug!("Skipping malformed row: {}", reason);
        }
        self.malformed += 1;
    }

    pub fn log(&self, source: &str) {
        info!("=== SCAN STATISTICS ({}) ===", source);
        info!("Rows read: {}", self.rows);
        info!("Entries extracted: {}", self.entries);
        info!("Malformed rows: {}", self.malformed);
        info!("Invalid values: {}", self.invalid);
        if !self.constructions.is_empty() {
            info!("Construction patterns:");
            let mut patterns: Vec<_> = self.constructions.iter().collect();
            patterns.sort_by(|a, b| b.1.cmp(a.1));
            for (pattern, count) in patterns {
                info!("  {}: {}", pattern, count);
            }
        }
    }
}

/// Visitor called with each entry. An error stops the scan and is propagated.
pub type Visitor<'a> = dyn FnMut(Entry) -> Result<(), Error> + 'a;

pub trait Source {
    /// Human readable description (path, kind).
    fn describe(&self) -> String;

    /// Scan the whole source, feeding every entry to `visit`.
    fn scan(&mut self, visit: &mut Visitor) -> Result<ScanStats, Error>;

    /// Values the source could not map to a known namespace, if it builds candidates.
    fn unknown_patterns(&self) -> Option<&BTreeSet<String>> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_malformed_row_is_counted() {
        let mut stats = ScanStats::default();
        for i in 0..WARN_LIMIT * 3 {
            stats.skip_malformed(format_args!("row {}", i));
        }
        assert_eq!(stats.malformed, WARN_LIMIT * 3);
        assert_eq!(stats.entries, 0);
    }
}
