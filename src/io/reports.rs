//! Side outputs: failure list, type metadata, unknown patterns.
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::info;

use crate::error::Error;
use crate::normalization::TypeMetadata;

/// Number of tags shown in the type distribution log.
const TOP_TAGS: usize = 10;

/// Write one item per line.
pub fn write_lines<I, S>(path: &Path, lines: I) -> Result<usize, Error>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut w = BufWriter::new(File::create(path)?);
    let mut nb = 0;
    for line in lines {
        w.write_all(line.as_ref().as_bytes())?;
        w.write_all(b"\n")?;
        nb += 1;
    }
    w.flush()?;
    Ok(nb)
}

/// Write failed candidates, sorted, one per line.
pub fn write_failed_list<'a, I>(path: &Path, failed: I) -> Result<usize, Error>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut failed: Vec<&str> = failed.into_iter().collect();
    failed.sort_unstable();
    failed.dedup();
    let nb = write_lines(path, failed)?;
    info!("Saved {} failed normalizations to {:?}", nb, path);
    Ok(nb)
}

/// Write the type metadata document and log the most frequent tags.
pub fn write_type_metadata(path: &Path, types: &TypeMetadata) -> Result<(), Error> {
    let summary = types.summary();
    let mut w = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut w, &summary)?;
    w.flush()?;

    info!(
        "Saved biolink classes for {} normalized CURIEs to {:?}",
        summary.total_normalized_curies, path
    );
    if !summary.class_distribution.is_empty() {
        info!("Top biolink classes:");
        for (tag, count) in summary.class_distribution.iter().take(TOP_TAGS) {
            info!("  {}: {}", tag, count);
        }
    }
    Ok(())
}

/// Write values no construction rule could map, sorted, one per line.
pub fn write_unknown_patterns(path: &Path, unknown: &BTreeSet<String>) -> Result<usize, Error> {
    let nb = write_lines(path, unknown)?;
    info!("Saved {} unknown patterns to {:?}", nb, path);
    Ok(nb)
}
