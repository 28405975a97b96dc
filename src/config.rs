//! Run parameters.
//!
//! There is no configuration file: every value has a default here
//! and can be overridden from the command line (see [crate::cli]).
use std::time::Duration;

/// Default node normalizer endpoint.
pub const NODE_NORM_URL: &str = "https://nodenormalization-sri.renci.org/get_normalized_nodes";

/// Default number of candidates per normalization request.
pub const DEFAULT_BATCH_SIZE: usize = 10_000;

/// Default number of rows per page when reading a paged source.
pub const DEFAULT_CHUNK_SIZE: usize = 50_000;

/// Remote client settings.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Checked when the client is built.
    pub endpoint: String,
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub timeout: Duration,
    pub conflate: bool,
    pub drug_chemical_conflate: bool,
}

impl ClientConfig {
    /// Default settings pointing to another endpoint.
    pub fn with_endpoint(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            ..Default::default()
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: NODE_NORM_URL.to_string(),
            max_retries: 5,
            base_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(300),
            timeout: Duration::from_secs(120),
            conflate: true,
            drug_chemical_conflate: true,
        }
    }
}

/// Cleaner settings.
#[derive(Debug, Clone)]
pub struct CleanerConfig {
    pub batch_size: usize,
    pub chunk_size: usize,
    /// Buffer emitted records and write them sorted by canonical identifier.
    /// This trades the bounded memory of the streaming path for deterministic output order.
    pub sort_output: bool,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            chunk_size: DEFAULT_CHUNK_SIZE,
            sort_output: false,
        }
    }
}
