//! OmniCorp directories.
//!
//! A directory of `*.tsv` files, each line being `pubmed_url \t entity_iri`.
//! Files are read in name order.
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use log::info;

use crate::error::Error;
use crate::identifiers::{pmid_from_url, IriConverter};

use super::{Entry, ScanStats, Source, Visitor};

const LOG_EVERY: usize = 10_000_000;

pub struct OmniCorpSource {
    dir: PathBuf,
    converter: IriConverter,
}

impl OmniCorpSource {
    pub fn new(dir: &Path) -> Result<Self, Error> {
        Ok(Self {
            dir: dir.to_path_buf(),
            converter: IriConverter::new()?,
        })
    }

    /// Sorted list of the `.tsv` files of the directory.
    pub fn files(&self) -> Result<Vec<PathBuf>, Error> {
        let pattern = format!(
            "{}/*.tsv",
            glob::Pattern::escape(&self.dir.to_string_lossy())
        );
        let mut files = glob::glob(&pattern)?.collect::<Result<Vec<_>, _>>()?;
        if files.is_empty() {
            return Err(Error::NoSourceFiles(self.dir.clone()));
        }
        files.sort();
        Ok(files)
    }
}

impl Source for OmniCorpSource {
    fn describe(&self) -> String {
        format!("OmniCorp directory {:?}", self.dir)
    }

    fn scan(&mut self, visit: &mut Visitor) -> Result<ScanStats, Error> {
        let files = self.files()?;
        info!("Found {} TSV files to process", files.len());
        let mut stats = ScanStats::default();
        self.converter.reset_counts();

        for (idx, path) in files.iter().enumerate() {
            info!("Processing {:?} ({}/{})...", path, idx + 1, files.len());
            let mut reader = BufReader::new(File::open(path)?);
            let mut buf = Vec::new();

            loop {
                buf.clear();
                if reader.read_until(b'\n', &mut buf)? == 0 {
                    break;
                }
                stats.rows += 1;
                if stats.rows % LOG_EVERY == 0 {
                    info!("{} lines processed", stats.rows);
                }

                let line = match std::str::from_utf8(&buf) {
                    Ok(l) => l.trim(),
                    Err(e) => {
                        stats.skip_malformed(format_args!("{:?}: invalid utf-8 ({})", path, e));
                        continue;
                    }
                };
                if line.is_empty() {
                    continue;
                }

                let (url, iri) = match line.split_once('\t') {
                    Some((url, iri)) if !iri.contains('\t') => (url, iri),
                    _ => {
                        stats.skip_malformed(format_args!("{:?}: {:?}", path, line));
                        continue;
                    }
                };

                let pmid = match pmid_from_url(url) {
                    Some(p) => p,
                    None => {
                        stats.invalid += 1;
                        continue;
                    }
                };

                stats.entries += 1;
                visit(Entry {
                    candidate: self.converter.convert(iri),
                    publications: vec![pmid],
                })?;
            }
        }

        stats.constructions = self.converter.counts().clone();
        Ok(stats)
    }

    fn unknown_patterns(&self) -> Option<&BTreeSet<String>> {
        Some(self.converter.unknown())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("b.tsv"),
            "https://www.ncbi.nlm.nih.gov/pubmed/2\thttp://purl.obolibrary.org/obo/CHEBI_17822\n\
             https://www.ncbi.nlm.nih.gov/pubmed/x\thttp://purl.obolibrary.org/obo/CHEBI_17822\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("a.tsv"),
            "https://www.ncbi.nlm.nih.gov/pubmed/1\thttp://id.nlm.nih.gov/mesh/D014346\n\
             only one field\n\
             https://www.ncbi.nlm.nih.gov/pubmed/1\thttp://example.org/unknown/1\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("ignored.txt"), "whatever\n").unwrap();

        let mut source = OmniCorpSource::new(dir.path()).unwrap();
        let mut entries = Vec::new();
        let stats = source
            .scan(&mut |e| {
                entries.push(e);
                Ok(())
            })
            .unwrap();

        assert_eq!(
            entries,
            vec![
                Entry::new("MESH:D014346", &[1]),
                Entry::new("http://example.org/unknown/1", &[1]),
                Entry::new("CHEBI:17822", &[2]),
            ]
        );
        assert_eq!(stats.rows, 5);
        assert_eq!(stats.malformed, 1);
        assert_eq!(stats.invalid, 1);
        assert!(source
            .unknown_patterns()
            .unwrap()
            .contains("http://example.org/unknown/1"));
    }

    #[test]
    fn invalid_utf8_lines_are_counted() {
        let dir = tempfile::tempdir().unwrap();
        let mut bytes =
            b"https://www.ncbi.nlm.nih.gov/pubmed/1\thttp://id.nlm.nih.gov/mesh/D014346\n".to_vec();
        for _ in 0..15 {
            bytes.extend_from_slice(b"https://www.ncbi.nlm.nih.gov/pubmed/2\t\xff\xfe\n");
        }
        std::fs::write(dir.path().join("a.tsv"), bytes).unwrap();

        let mut source = OmniCorpSource::new(dir.path()).unwrap();
        let mut entries = Vec::new();
        let stats = source
            .scan(&mut |e| {
                entries.push(e);
                Ok(())
            })
            .unwrap();

        assert_eq!(stats.rows, 16);
        assert_eq!(stats.malformed, 15);
        assert_eq!(entries, vec![Entry::new("MESH:D014346", &[1])]);
    }

    #[test]
    fn empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = OmniCorpSource::new(dir.path()).unwrap();
        assert!(matches!(
            source.scan(&mut |_| Ok(())),
            Err(Error::NoSourceFiles(_))
        ));
    }
}
