//! Line delimited JSON writer.
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::info;
use serde::Serialize;

use crate::error::Error;

/// Log every n records.
const LOG_EVERY: usize = 10_000;

/// Writes one JSON object per line.
///
/// Output is buffered: call [JsonlWriter::finish] to flush and get the number of lines written.
/// Dropping the writer flushes too, but swallows errors.
pub struct JsonlWriter {
    path: PathBuf,
    inner: BufWriter<File>,
    written: usize,
}

impl JsonlWriter {
    /// Create (or truncate) the file at `path`.
    pub fn create(path: &Path) -> Result<Self, Error> {
        let file = File::create(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            inner: BufWriter::new(file),
            written: 0,
        })
    }

    pub fn write<T: Serialize>(&mut self, item: &T) -> Result<(), Error> {
        serde_json::to_writer(&mut self.inner, item)?;
        self.inner.write_all(b"\n")?;
        self.written += 1;
        if self.written % LOG_EVERY == 0 {
            info!("Written {} records to {:?}", self.written, self.path);
        }
        Ok(())
    }

    pub fn write_all<'a, T, I>(&mut self, items: I) -> Result<(), Error>
    where
        T: Serialize + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        for item in items {
            self.write(item)?;
        }
        Ok(())
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn finish(mut self) -> Result<usize, Error> {
        self.inner.flush()?;
        Ok(self.written)
    }
}

#[cfg(test)]
mod tests {
    use crate::record::NormalizationRecord;

    use super::*;

    #[test]
    fn one_object_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jsonl");

        let records = vec![
            NormalizationRecord {
                curie: "A:1".to_string(),
                original_curies: vec!["A:1".to_string()],
                publications: vec!["PMID:1".to_string()],
            },
            NormalizationRecord {
                curie: "B:1".to_string(),
                original_curies: vec!["B:1".to_string(), "B:2".to_string()],
                publications: vec![],
            },
        ];

        let mut w = JsonlWriter::create(&path).unwrap();
        w.write_all(&records).unwrap();
        assert_eq!(w.finish().unwrap(), 2);

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            r#"{"curie":"A:1","original_curies":["A:1"],"publications":["PMID:1"]}"#
        );
        assert!(content.ends_with('\n'));
    }
}
