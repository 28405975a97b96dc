//! Two-pass cleaning of a source.
//!
//! Pass 1 collects the distinct candidates of a source and normalizes them, pass 2 scans the
//! source again and streams merged records out through a [MergeTracker].
//!
//! Failure list and type metadata are written at the end of a run, and also when a run aborts
//! after data has been read.
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, error, info, warn};

use crate::api::NormalizationService;
use crate::config::CleanerConfig;
use crate::error::Error;
use crate::io::{self, JsonlWriter};
use crate::normalization::{KnownPublications, Normalizer};
use crate::record::NormalizationRecord;
use crate::sources::{ScanStats, Source};

use super::merge::{failed_records, merge_normalized, to_records};
use super::{MergeTracker, Stage};

/// Number of times a candidate occurs in a source.
#[derive(Debug, Default, Clone, Copy)]
struct Occurrences(u32);

/// The first pass only keeps candidates: failures carry no publication.
impl KnownPublications for Occurrences {
    fn known_publications(&self) -> &[u64] {
        &[]
    }
}

/// Outcome of a successful run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleanReport {
    pub records_written: usize,
    pub failed: usize,
    /// Canonical identifiers that never completed (partial or unseen).
    pub incomplete: usize,
    /// Statistics of the last scan.
    pub stats: ScanStats,
}

pub struct Cleaner<S> {
    name: String,
    dst: PathBuf,
    config: CleanerConfig,
    normalizer: Normalizer<S>,
    stage: Stage,
}

impl<S: NormalizationService> Cleaner<S> {
    /// Cleaner for dataset `name`, writing its outputs into `dst`.
    pub fn new(name: &str, dst: &Path, config: CleanerConfig, service: S) -> Self {
        Self {
            name: name.to_string(),
            dst: dst.to_path_buf(),
            config,
            normalizer: Normalizer::new(service),
            stage: Stage::Init,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn normalizer(&self) -> &Normalizer<S> {
        &self.normalizer
    }

    fn advance(&mut self, to: Stage) -> Result<(), Error> {
        self.stage.advance(to)?;
        info!("[{}] {:?}", self.name, to);
        Ok(())
    }

    fn output_path(&self, suffix: &str) -> PathBuf {
        io::output_path(&self.dst, &self.name, suffix)
    }

    /// Start from a clean state so that a cleaner can be run again.
    fn start(&mut self) -> Result<(), Error> {
        fs::create_dir_all(&self.dst)?;
        self.remove_stale_outputs()?;
        self.stage = Stage::Init;
        self.normalizer.clear_failed();
        self.normalizer.clear_types();
        self.advance(Stage::Pass1Scanning)
    }

    /// Outputs that are only written by some runs, and would otherwise outlive them.
    fn remove_stale_outputs(&self) -> Result<(), Error> {
        for suffix in [
            io::INCOMPLETE_SUFFIX,
            io::UNKNOWN_PATTERNS_SUFFIX,
            io::FAILED_RECORDS_SUFFIX,
        ] {
            let path = self.output_path(suffix);
            if path.is_file() {
                debug!("[{}] removing previous {:?}", self.name, path);
                fs::remove_file(&path)?;
            }
        }
        Ok(())
    }

    fn write_unknown_patterns(&self, source: &dyn Source) -> Result<(), Error> {
        if let Some(unknown) = source.unknown_patterns() {
            if !unknown.is_empty() {
                let path = self.output_path(io::UNKNOWN_PATTERNS_SUFFIX);
                io::write_unknown_patterns(&path, unknown)?;
            }
        }
        Ok(())
    }

    fn write_incomplete(&self, partial: &[NormalizationRecord]) -> Result<(), Error> {
        let mut w = JsonlWriter::create(&self.output_path(io::INCOMPLETE_SUFFIX))?;
        w.write_all(partial)?;
        w.finish()?;
        Ok(())
    }

    /// Failure list and type metadata.
    fn write_side_outputs(&self) -> Result<(), Error> {
        io::write_failed_list(
            &self.output_path(io::FAILED_LIST_SUFFIX),
            self.normalizer.failed_curies(),
        )?;
        io::write_type_metadata(&self.output_path(io::TYPES_SUFFIX), self.normalizer.types())
    }

    /// Write side outputs after an error, if there is something to write.
    /// The original error is kept, a failure to write is only logged.
    fn abort(&self, err: Error, data_read: bool) -> Error {
        error!("[{}] aborting at stage {:?}: {}", self.name, self.stage, err);
        if data_read {
            if let Err(e) = self.write_side_outputs() {
                error!("[{}] could not write failures and type metadata: {}", self.name, e);
            }
        }
        err
    }

    fn check_mapping(&self, mapping_len: usize, candidates: usize) -> Result<(), Error> {
        if mapping_len == 0 {
            error!(
                "[{}] No CURIEs could be normalized ({} candidates)",
                self.name, candidates
            );
            return Err(Error::NoNormalizations { candidates });
        }
        info!(
            "[{}] Normalized {}/{} candidates ({} failed)",
            self.name,
            mapping_len,
            candidates,
            self.normalizer.failed().len()
        );
        Ok(())
    }

    /// Streaming two-pass run.
    ///
    /// Memory is bounded by the candidate mapping and the canonical identifiers in progress.
    /// Records are written as they complete, or sorted at the end if
    /// [CleanerConfig::sort_output] is set.
    pub fn run(&mut self, source: &mut dyn Source) -> Result<CleanReport, Error> {
        self.start()?;
        info!("[{}] Pass 1: collecting candidates from {}", self.name, source.describe());

        let mut occurrences: BTreeMap<String, Occurrences> = BTreeMap::new();
        let first = source.scan(&mut |entry| {
            occurrences.entry(entry.candidate).or_default().0 += 1;
            Ok(())
        });
        let first = match first {
            Ok(stats) => stats,
            Err(e) => return Err(self.abort(e, !occurrences.is_empty())),
        };
        first.log(&source.describe());
        info!("[{}] Found {} unique candidates", self.name, occurrences.len());
        if let Err(e) = self.write_unknown_patterns(source) {
            return Err(self.abort(e, !occurrences.is_empty()));
        }

        self.advance(Stage::Pass1Normalizing)?;
        let mapping = self
            .normalizer
            .normalize_in_batches(&occurrences, self.config.batch_size);
        if let Err(e) = self.check_mapping(mapping.len(), occurrences.len()) {
            return Err(self.abort(e, !occurrences.is_empty()));
        }

        let counts: BTreeMap<String, u32> = occurrences
            .into_iter()
            .filter(|(candidate, _)| mapping.contains_key(candidate))
            .map(|(candidate, n)| (candidate, n.0))
            .collect();
        let mut tracker = MergeTracker::new(mapping, &counts);
        drop(counts);

        self.advance(Stage::Pass2ScanningAndEmitting)?;
        info!("[{}] Pass 2: merging and writing records", self.name);
        let cleaned = self.output_path(io::CLEANED_SUFFIX);
        let (records_written, second) =
            match self.second_pass(source, &mut tracker, &cleaned) {
                Ok(r) => r,
                Err(e) => return Err(self.abort(e, true)),
            };
        second.log(&source.describe());
        if second.entries != first.entries {
            warn!(
                "[{}] Source changed between passes: {} entries, then {}",
                self.name, first.entries, second.entries
            );
        }
        info!(
            "[{}] Written {} records to {:?} ({} rows skipped as unnormalized)",
            self.name,
            records_written,
            cleaned,
            tracker.skipped()
        );

        let leftovers = tracker.finish();
        if !leftovers.is_empty() {
            error!(
                "[{}] {} canonical identifiers did not complete ({} partial, {} unseen)",
                self.name,
                leftovers.len(),
                leftovers.partial.len(),
                leftovers.unseen.len()
            );
        }
        if !leftovers.partial.is_empty() {
            if let Err(e) = self.write_incomplete(&leftovers.partial) {
                return Err(self.abort(e, true));
            }
        }

        self.advance(Stage::Finalizing)?;
        self.write_side_outputs()?;
        self.advance(Stage::Done)?;

        Ok(CleanReport {
            records_written,
            failed: self.normalizer.failed().len(),
            incomplete: leftovers.len(),
            stats: second,
        })
    }

    fn second_pass(
        &self,
        source: &mut dyn Source,
        tracker: &mut MergeTracker,
        path: &Path,
    ) -> Result<(usize, ScanStats), Error> {
        let mut writer = JsonlWriter::create(path)?;
        let sort = self.config.sort_output;
        let mut buffered = Vec::new();

        let stats = source.scan(&mut |entry| {
            if let Some(record) = tracker.observe(entry) {
                if sort {
                    buffered.push(record);
                } else {
                    writer.write(&record)?;
                }
            }
            Ok(())
        })?;

        if sort {
            buffered.sort_by(|a, b| a.curie.cmp(&b.curie));
            writer.write_all(&buffered)?;
        }
        Ok((writer.finish()?, stats))
    }

    /// Single scan, everything held in memory, records sorted by canonical identifier.
    ///
    /// Also writes failures with their publications.
    pub fn run_in_memory(&mut self, source: &mut dyn Source) -> Result<CleanReport, Error> {
        self.start()?;
        info!("[{}] Loading {} in memory", self.name, source.describe());

        let mut candidates: BTreeMap<String, Vec<u64>> = BTreeMap::new();
        let stats = source.scan(&mut |entry| {
            candidates
                .entry(entry.candidate)
                .or_default()
                .extend(entry.publications);
            Ok(())
        });
        let stats = match stats {
            Ok(stats) => stats,
            Err(e) => return Err(self.abort(e, !candidates.is_empty())),
        };
        stats.log(&source.describe());
        info!("[{}] Found {} unique candidates", self.name, candidates.len());
        if let Err(e) = self.write_unknown_patterns(source) {
            return Err(self.abort(e, !candidates.is_empty()));
        }

        self.advance(Stage::Pass1Normalizing)?;
        let mapping = self
            .normalizer
            .normalize_in_batches(&candidates, self.config.batch_size);
        if let Err(e) = self.check_mapping(mapping.len(), candidates.len()) {
            let err = self.abort(e, !candidates.is_empty());
            self.write_failed_records()?;
            return Err(err);
        }

        self.advance(Stage::Pass2ScanningAndEmitting)?;
        let records = to_records(merge_normalized(&candidates, &mapping));
        let cleaned = self.output_path(io::CLEANED_SUFFIX);
        let records_written = match Self::write_records(&cleaned, &records) {
            Ok(n) => n,
            Err(e) => return Err(self.abort(e, true)),
        };
        info!("[{}] Written {} records to {:?}", self.name, records_written, cleaned);

        self.advance(Stage::Finalizing)?;
        self.write_side_outputs()?;
        self.write_failed_records()?;
        self.advance(Stage::Done)?;

        Ok(CleanReport {
            records_written,
            failed: self.normalizer.failed().len(),
            incomplete: 0,
            stats,
        })
    }

    fn write_records(path: &Path, records: &[NormalizationRecord]) -> Result<usize, Error> {
        let mut writer = JsonlWriter::create(path)?;
        writer.write_all(records)?;
        writer.finish()
    }

    fn write_failed_records(&self) -> Result<(), Error> {
        let mut w = JsonlWriter::create(&self.output_path(io::FAILED_RECORDS_SUFFIX))?;
        w.write_all(&failed_records(self.normalizer.failed()))?;
        w.finish()?;
        Ok(())
    }
}
