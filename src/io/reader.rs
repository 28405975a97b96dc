//! Loading line delimited JSON back.
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::Error;

/// Read every non-blank line of `path` as a `T`.
pub fn read_jsonl<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, Error> {
    let reader = BufReader::new(File::open(path)?);
    let mut items = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        items.push(serde_json::from_str(&line)?);
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use crate::record::FailedNormalization;

    use super::*;

    #[test]
    fn read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("failed.jsonl");
        std::fs::write(
            &path,
            "{\"curie\":\"X:1\",\"publications\":[\"PMID:9\"]}\n\n{\"curie\":\"Y:1\",\"publications\":[]}\n",
        )
        .unwrap();

        let items: Vec<FailedNormalization> = read_jsonl(&path).unwrap();
        assert_eq!(
            items,
            vec![
                FailedNormalization::new("X:1".to_string(), &[9]),
                FailedNormalization::new("Y:1".to_string(), &[]),
            ]
        );
    }

    #[test]
    fn invalid_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.jsonl");
        std::fs::write(&path, "not json\n").unwrap();
        assert!(read_jsonl::<FailedNormalization>(&path).is_err());
    }
}
