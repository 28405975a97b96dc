//! In-memory rows, for small datasets and for feeding the cleaner from other code.
use super::{Entry, ScanStats, Source, Visitor};
use crate::error::Error;

#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    entries: Vec<Entry>,
}

impl MemorySource {
    pub fn new(entries: Vec<Entry>) -> Self {
        Self { entries }
    }
}

impl FromIterator<Entry> for MemorySource {
    fn from_iter<T: IntoIterator<Item = Entry>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl Source for MemorySource {
    fn describe(&self) -> String {
        format!("{} in-memory rows", self.entries.len())
    }

    fn scan(&mut self, visit: &mut Visitor) -> Result<ScanStats, Error> {
        let mut stats = ScanStats::default();
        for entry in &self.entries {
            stats.rows += 1;
            stats.entries += 1;
            visit(entry.clone())?;
        }
        Ok(stats)
    }
}
