//! Gzipped PubTator annotation dumps.
//!
//! Tab separated, five fields per line: `pmid  type  concept_id(s)  mentions  resource`.
//! Concept ids may be `;`-separated, each one becomes an entry sharing the line's pmid.
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;
use log::info;

use crate::error::Error;
use crate::identifiers::pubtator::split_concepts;
use crate::identifiers::{ConceptBuilder, EntityType};

use super::{Entry, ScanStats, Source, Visitor};

const NB_FIELDS: usize = 5;

/// Log every n lines.
const LOG_EVERY: usize = 1_000_000;

pub struct PubTatorSource {
    path: PathBuf,
    builder: ConceptBuilder,
}

impl PubTatorSource {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            builder: ConceptBuilder::new(),
        }
    }

    /// Open the dump, using a multi gz decoder since dumps can be concatenated gzip members.
    fn open(&self) -> Result<BufReader<MultiGzDecoder<File>>, Error> {
        let file = File::open(&self.path)?;
        Ok(BufReader::new(MultiGzDecoder::new(file)))
    }
}

impl Source for PubTatorSource {
    fn describe(&self) -> String {
        format!("PubTator dump {:?}", self.path)
    }

    fn scan(&mut self, visit: &mut Visitor) -> Result<ScanStats, Error> {
        info!("Reading PubTator annotations from {:?}", self.path);
        let mut reader = self.open()?;
        let mut stats = ScanStats::default();
        self.builder.reset_counts();

        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            stats.rows += 1;
            let line_nb = stats.rows;
            if line_nb % LOG_EVERY == 0 {
                info!("{} lines processed", line_nb);
            }

            let line = match std::str::from_utf8(&buf) {
                Ok(l) => l.trim(),
                Err(e) => {
                    stats.skip_malformed(format_args!("line {}: invalid utf-8 ({})", line_nb, e));
                    continue;
                }
            };
            if line.is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() != NB_FIELDS {
                stats.skip_malformed(format_args!(
                    "line {}: expected {} fields, got {}",
                    line_nb,
                    NB_FIELDS,
                    fields.len()
                ));
                continue;
            }

            let pmid: u64 = match fields[0].trim().parse() {
                Ok(p) => p,
                Err(_) => {
                    stats.skip_malformed(format_args!(
                        "line {}: invalid pmid {:?}",
                        line_nb, fields[0]
                    ));
                    continue;
                }
            };
            let entity_type = EntityType::from(fields[1]);

            for concept in split_concepts(fields[2]) {
                if let Some(candidate) = self.builder.build(concept, &entity_type) {
                    stats.entries += 1;
                    visit(Entry {
                        candidate,
                        publications: vec![pmid],
                    })?;
                }
            }
        }

        stats.invalid = self.builder.invalid();
        stats.constructions = self.builder.counts().clone();
        Ok(stats)
    }

    fn unknown_patterns(&self) -> Option<&BTreeSet<String>> {
        Some(self.builder.unknown())
    }
}
