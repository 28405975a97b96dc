//! # curie-clean
//!
//! Normalizes the entity identifiers of literature co-occurrence datasets (NGD, PubTator, OmniCorp)
//! through a node normalization service, and merges the publications of identifiers that collapse
//! onto the same canonical identifier.
//!
//! ```sh
//! USAGE:
//!     curie-clean <SUBCOMMAND>
//!
//! SUBCOMMANDS:
//!     help        Prints this message or the help of the given subcommand(s)
//!     omnicorp    Clean a directory of OmniCorp TSV files
//!     pubtator    Clean a gzipped PubTator annotation dump
//!     sqlite      Clean a curie_to_pmids SQLite table (NGD, or converted PubTator/OmniCorp)
//! ```
//!
//! Logging is configured with `RUST_LOG` (e.g. `RUST_LOG=info`).
use std::path::Path;

use structopt::StructOpt;

use curie_clean::api::NodeNormClient;
use curie_clean::cli::{CurieClean, RunOptions};
use curie_clean::error::Error;
use curie_clean::processing::{CleanReport, Cleaner};
use curie_clean::sources::{OmniCorpSource, PubTatorSource, Source, SqliteSource};

#[macro_use]
extern crate log;

fn clean(
    name: &str,
    dst: &Path,
    options: &RunOptions,
    source: &mut dyn Source,
) -> Result<CleanReport, Error> {
    let client = NodeNormClient::new(&options.client_config())?;
    let mut cleaner = Cleaner::new(name, dst, options.cleaner_config(), client);
    if options.in_memory {
        cleaner.run_in_memory(source)
    } else {
        cleaner.run(source)
    }
}

fn main() -> Result<(), Error> {
    env_logger::init();

    let opt = CurieClean::from_args();
    debug!("cli args\n{:#?}", opt);

    let (name, report) = match opt {
        CurieClean::Sqlite(s) => {
            let mut source = SqliteSource::new(&s.src, s.options.chunk_size);
            (s.name.clone(), clean(&s.name, &s.dst, &s.options, &mut source)?)
        }
        CurieClean::Pubtator(p) => {
            let mut source = PubTatorSource::new(&p.src);
            (p.name.clone(), clean(&p.name, &p.dst, &p.options, &mut source)?)
        }
        CurieClean::Omnicorp(o) => {
            let mut source = OmniCorpSource::new(&o.src)?;
            (o.name.clone(), clean(&o.name, &o.dst, &o.options, &mut source)?)
        }
    };

    info!(
        "[{}] done: {} records, {} failed normalizations, {} incomplete",
        name, report.records_written, report.failed, report.incomplete
    );
    Ok(())
}
