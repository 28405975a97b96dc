//! Error enum
use std::fmt;
use std::path::PathBuf;

use crate::processing::Stage;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Sqlite(rusqlite::Error),
    Http(reqwest::Error),
    Serde(serde_json::Error),
    Url(url::ParseError),
    Glob(glob::GlobError),
    GlobPattern(glob::PatternError),
    Regex(regex::Error),
    /// Non-success HTTP status returned by the remote service.
    HttpStatus(u16),
    /// Every attempt of a retried call failed. `last` holds the final failure.
    RetriesExhausted {
        attempts: u32,
        last: Box<Error>,
    },
    /// Pass 1 produced no mapping at all: nothing to merge.
    NoNormalizations {
        candidates: usize,
    },
    NoSourceFiles(PathBuf),
    StageOrder {
        from: Stage,
        to: Stage,
    },
    Custom(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "io error: {}", e),
            Error::Sqlite(e) => write!(f, "sqlite error: {}", e),
            Error::Http(e) => write!(f, "http error: {}", e),
            Error::Serde(e) => write!(f, "json error: {}", e),
            Error::Url(e) => write!(f, "invalid url: {}", e),
            Error::Glob(e) => write!(f, "glob error: {}", e),
            Error::GlobPattern(e) => write!(f, "invalid glob pattern: {}", e),
            Error::Regex(e) => write!(f, "invalid regex: {}", e),
            Error::HttpStatus(code) => write!(f, "remote service answered with HTTP {}", code),
            Error::RetriesExhausted { attempts, last } => write!(
                f,
                "failed to complete request after {} attempts (last error: {})",
                attempts, last
            ),
            Error::NoNormalizations { candidates } => write!(
                f,
                "none of the {} candidate identifiers could be normalized",
                candidates
            ),
            Error::NoSourceFiles(p) => write!(f, "no source files found in {:?}", p),
            Error::StageOrder { from, to } => {
                write!(f, "illegal stage transition {:?} -> {:?}", from, to)
            }
            Error::Custom(s) => write!(f, "{}", s),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error::Io(e)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(e: rusqlite::Error) -> Error {
        Error::Sqlite(e)
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Error {
        Error::Http(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Error {
        Error::Serde(e)
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Error {
        Error::Url(e)
    }
}

impl From<glob::GlobError> for Error {
    fn from(e: glob::GlobError) -> Error {
        Error::Glob(e)
    }
}

impl From<glob::PatternError> for Error {
    fn from(e: glob::PatternError) -> Error {
        Error::GlobPattern(e)
    }
}

impl From<regex::Error> for Error {
    fn from(e: regex::Error) -> Error {
        Error::Regex(e)
    }
}

impl From<String> for Error {
    fn from(s: String) -> Error {
        Error::Custom(s)
    }
}
