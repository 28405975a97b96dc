//! Command line arguments and parameters management/parsing.
use std::path::PathBuf;
use std::time::Duration;

use structopt::StructOpt;

use crate::config::{CleanerConfig, ClientConfig};

#[derive(Debug, StructOpt)]
#[structopt(
    name = "curie-clean",
    about = "CURIE normalization and merge of literature co-occurrence datasets."
)]
/// Holds every command that is callable by the `curie-clean` command.
pub enum CurieClean {
    #[structopt(
        about = "Clean a curie_to_pmids SQLite table (NGD, or converted PubTator/OmniCorp)"
    )]
    Sqlite(Sqlite),
    #[structopt(about = "Clean a gzipped PubTator annotation dump")]
    Pubtator(PubTator),
    #[structopt(about = "Clean a directory of OmniCorp TSV files")]
    Omnicorp(OmniCorp),
}

#[derive(Debug, StructOpt)]
pub struct Sqlite {
    #[structopt(parse(from_os_str), help = "source database")]
    pub src: PathBuf,
    #[structopt(parse(from_os_str), help = "destination folder")]
    pub dst: PathBuf,
    #[structopt(long = "name", help = "dataset name, used to name outputs")]
    pub name: String,
    #[structopt(flatten)]
    pub options: RunOptions,
}

#[derive(Debug, StructOpt)]
pub struct PubTator {
    #[structopt(parse(from_os_str), help = "source annotation file (.gz)")]
    pub src: PathBuf,
    #[structopt(parse(from_os_str), help = "destination folder")]
    pub dst: PathBuf,
    #[structopt(long = "name", default_value = "pubtator")]
    pub name: String,
    #[structopt(flatten)]
    pub options: RunOptions,
}

#[derive(Debug, StructOpt)]
pub struct OmniCorp {
    #[structopt(parse(from_os_str), help = "source folder of .tsv files")]
    pub src: PathBuf,
    #[structopt(parse(from_os_str), help = "destination folder")]
    pub dst: PathBuf,
    #[structopt(long = "name", default_value = "omnicorp")]
    pub name: String,
    #[structopt(flatten)]
    pub options: RunOptions,
}

/// Options shared by every subcommand.
#[derive(Debug, StructOpt)]
pub struct RunOptions {
    #[structopt(
        long = "batch-size",
        help = "candidates per normalization request",
        default_value = "10000"
    )]
    pub batch_size: usize,
    #[structopt(
        long = "chunk-size",
        help = "rows per page for paged sources",
        default_value = "50000"
    )]
    pub chunk_size: usize,
    #[structopt(
        long = "endpoint",
        help = "node normalizer endpoint",
        default_value = "https://nodenormalization-sri.renci.org/get_normalized_nodes"
    )]
    pub endpoint: String,
    #[structopt(long = "max-retries", default_value = "5")]
    pub max_retries: u32,
    #[structopt(long = "timeout", help = "request timeout, in seconds", default_value = "120")]
    pub timeout: u64,
    #[structopt(long = "sorted", help = "write records sorted by canonical identifier")]
    pub sorted: bool,
    #[structopt(long = "in-memory", help = "load the whole source in memory (single scan)")]
    pub in_memory: bool,
}

impl RunOptions {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            max_retries: self.max_retries,
            timeout: Duration::from_secs(self.timeout),
            ..ClientConfig::with_endpoint(&self.endpoint)
        }
    }

    pub fn cleaner_config(&self) -> CleanerConfig {
        CleanerConfig {
            batch_size: self.batch_size,
            chunk_size: self.chunk_size,
            sort_output: self.sorted,
        }
    }
}
