//! `curie_to_pmids` SQLite tables.
//!
//! Schema: `curie_to_pmids(curie TEXT, pmids TEXT)` where `pmids` is a list literal (`[1, 2, 3]`).
//! This is the NGD layout, and the layout PubTator/OmniCorp dumps are usually converted to.
use std::path::{Path, PathBuf};

use log::info;
use rusqlite::{params, Connection, OpenFlags};

use crate::error::Error;

use super::{Entry, ScanStats, Source, Visitor};

const PAGE_QUERY: &str = "SELECT curie, pmids FROM curie_to_pmids ORDER BY rowid LIMIT ?1 OFFSET ?2";

/// Log every n pages.
const LOG_EVERY: usize = 10;

/// Parse a publication list literal.
pub fn parse_pmids(literal: &str) -> Result<Vec<u64>, serde_json::Error> {
    serde_json::from_str(literal)
}

/// Paged reader over a `curie_to_pmids` table.
pub struct SqliteSource {
    path: PathBuf,
    chunk_size: usize,
}

impl SqliteSource {
    pub fn new(path: &Path, chunk_size: usize) -> Self {
        Self {
            path: path.to_path_buf(),
            chunk_size: chunk_size.max(1),
        }
    }

    fn open(&self) -> Result<Connection, Error> {
        Ok(Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?)
    }

    /// Fetch a single page of raw rows.
    fn page(
        conn: &Connection,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<(Option<String>, Option<String>)>, Error> {
        let mut stmt = conn.prepare_cached(PAGE_QUERY)?;
        let rows = stmt
            .query_map(params![limit as i64, offset as i64], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

impl Source for SqliteSource {
    fn describe(&self) -> String {
        format!("sqlite table curie_to_pmids in {:?}", self.path)
    }

    fn scan(&mut self, visit: &mut Visitor) -> Result<ScanStats, Error> {
        info!(
            "Extracting data from {:?} in chunks of {}",
            self.path, self.chunk_size
        );
        let conn = self.open()?;
        let mut stats = ScanStats::default();
        let mut offset = 0;
        let mut page_nb = 1;

        loop {
            let rows = Self::page(&conn, self.chunk_size, offset)?;
            if rows.is_empty() {
                break;
            }

            for row in rows {
                stats.rows += 1;
                let (curie, pmids) = match row {
                    (Some(curie), Some(pmids)) => (curie, pmids),
                    (curie, _) => {
                        stats.skip_malformed(format_args!("missing curie or pmids ({:?})", curie));
                        continue;
                    }
                };

                match parse_pmids(&pmids) {
                    Ok(publications) => {
                        stats.entries += 1;
                        visit(Entry {
                            candidate: curie,
                            publications,
                        })?;
                    }
                    Err(e) => {
                        stats.skip_malformed(format_args!(
                            "failed to parse pmids for {}: {} - {}",
                            curie, pmids, e
                        ));
                    }
                }
            }

            if page_nb % LOG_EVERY == 0 {
                info!(
                    "Extracted chunk {} ({} records processed)",
                    page_nb, stats.rows
                );
            }
            offset += self.chunk_size;
            page_nb += 1;
        }

        Ok(stats)
    }
}
