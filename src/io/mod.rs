/*!
# IO utilities

Saving (and loading back) the outputs of a cleaning run.

Every output of a dataset lives in the same destination folder and is named
`{dataset}_{suffix}`, see [output_path].
!*/
mod reader;
mod reports;
mod writer;

use std::path::{Path, PathBuf};

pub use reader::read_jsonl;
pub use reports::{write_failed_list, write_lines, write_type_metadata, write_unknown_patterns};
pub use writer::JsonlWriter;

pub const CLEANED_SUFFIX: &str = "cleaned.jsonl";
pub const FAILED_LIST_SUFFIX: &str = "failed_normalizations.txt";
pub const FAILED_RECORDS_SUFFIX: &str = "failed_normalizations.jsonl";
pub const TYPES_SUFFIX: &str = "biolink_classes.json";
pub const INCOMPLETE_SUFFIX: &str = "incomplete.jsonl";
pub const UNKNOWN_PATTERNS_SUFFIX: &str = "unknown_patterns.txt";

/// Path of a dataset output.
pub fn output_path(dst: &Path, dataset: &str, suffix: &str) -> PathBuf {
    dst.join(format!("{}_{}", dataset, suffix))
}
