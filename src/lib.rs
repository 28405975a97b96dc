//! # curie-clean
//!
//! Two-pass CURIE normalization and merge of literature co-occurrence datasets.
//!
//! A [sources::Source] is scanned once to collect candidate identifiers, which are normalized
//! in batches by a [api::NormalizationService]. The source is then scanned again and the
//! publications of every candidate collapsing onto a canonical identifier are merged into a
//! [record::NormalizationRecord], written as soon as it is complete.
//!
//! ```no_run
//! use std::path::Path;
//!
//! use curie_clean::api::NodeNormClient;
//! use curie_clean::config::{CleanerConfig, ClientConfig};
//! use curie_clean::processing::Cleaner;
//! use curie_clean::sources::SqliteSource;
//!
//! # fn main() -> Result<(), curie_clean::error::Error> {
//! let client = NodeNormClient::new(&ClientConfig::default())?;
//! let config = CleanerConfig::default();
//! let mut source = SqliteSource::new(Path::new("ngd.sqlite"), config.chunk_size);
//! let mut cleaner = Cleaner::new("ngd", Path::new("out"), config, client);
//! let report = cleaner.run(&mut source)?;
//! println!("{} records", report.records_written);
//! # Ok(())
//! # }
//! ```
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod identifiers;
pub mod io;
pub mod normalization;
pub mod processing;
pub mod record;
pub mod sources;
