//! PubTator concept identifiers.
//!
//! PubTator annotates mentions with a type (`Species`, `Gene`, ...) and a concept id that is
//! either already a CURIE (`MESH:D000086382`), a bare number whose prefix is implied by the type,
//! a Cellosaurus accession (`CVCL_0030`), or `-` when no concept was found.
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use log::warn;

/// Sentinel for "no concept".
const NO_CONCEPT: &str = "-";

/// Cellosaurus accessions come with a prefix that is not a registered CURIE prefix.
const CELLOSAURUS_RAW: &str = "CVCL_";
const CELLOSAURUS_PREFIX: &str = "Cellosaurus:";

/// Numeric ids without a namespace are logged a few times per type, then silenced.
const WARN_LIMIT: usize = 5;
const CHEMICAL_WARN_LIMIT: usize = 10;

/// Annotation type, matched case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityType {
    Species,
    Gene,
    Disease,
    Chemical,
    /// Any other type, with its original spelling.
    Other(String),
}

impl From<&str> for EntityType {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "species" => EntityType::Species,
            "gene" => EntityType::Gene,
            "disease" => EntityType::Disease,
            "chemical" => EntityType::Chemical,
            _ => EntityType::Other(s.to_string()),
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityType::Species => write!(f, "Species"),
            EntityType::Gene => write!(f, "Gene"),
            EntityType::Disease => write!(f, "Disease"),
            EntityType::Chemical => write!(f, "Chemical"),
            EntityType::Other(s) => write!(f, "{}", s),
        }
    }
}

impl EntityType {
    /// Prefix given to bare numeric ids of this type.
    pub fn numeric_prefix(&self) -> String {
        match self {
            EntityType::Species => "NCBITaxon".to_string(),
            EntityType::Gene => "NCBIGene".to_string(),
            EntityType::Disease => "OMIM".to_string(),
            // numeric chemical ids have no reliable namespace.
            EntityType::Chemical => "UNKNOWN_CHEMICAL".to_string(),
            EntityType::Other(s) => format!("UNKNOWN_{}", s.to_uppercase()),
        }
    }

    /// true if numeric ids of this type map to a real namespace.
    pub fn has_known_prefix(&self) -> bool {
        !matches!(self, EntityType::Chemical | EntityType::Other(_))
    }

    /// Numeric ids without a namespace logged at warn level.
    fn warn_limit(&self) -> usize {
        match self {
            EntityType::Chemical => CHEMICAL_WARN_LIMIT,
            _ => WARN_LIMIT,
        }
    }
}

/// Which construction rule produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Already a CURIE, kept as is.
    Curie,
    /// Bare number, prefixed according to its type.
    Numeric,
    /// `CVCL_` accession rewritten to `Cellosaurus:`.
    Cellosaurus,
    /// Unrecognized shape, kept as is.
    Other,
}

/// Build the candidate for a single concept id.
///
/// Returns [None] for the `-` sentinel and blank values.
pub fn concept_to_curie(concept_id: &str, entity_type: &EntityType) -> Option<(String, Rule)> {
    if concept_id == NO_CONCEPT || concept_id.trim().is_empty() {
        return None;
    }

    if concept_id.contains(':') {
        return Some((concept_id.to_string(), Rule::Curie));
    }

    if concept_id.bytes().all(|b| b.is_ascii_digit()) {
        let curie = format!("{}:{}", entity_type.numeric_prefix(), concept_id);
        return Some((curie, Rule::Numeric));
    }

    if let Some(accession) = concept_id.strip_prefix(CELLOSAURUS_RAW) {
        return Some((
            format!("{}{}", CELLOSAURUS_PREFIX, accession),
            Rule::Cellosaurus,
        ));
    }

    Some((concept_id.to_string(), Rule::Other))
}

/// Split a `;`-separated concept field into its non-empty parts.
pub fn split_concepts(field: &str) -> impl Iterator<Item = &str> {
    field.split(';').map(str::trim).filter(|c| !c.is_empty())
}

/// Stateful wrapper around [concept_to_curie] keeping statistics and unknown patterns.
#[derive(Debug, Default)]
pub struct ConceptBuilder {
    counts: BTreeMap<String, usize>,
    unknown: BTreeSet<String>,
    invalid: usize,
}

impl ConceptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build(&mut self, concept_id: &str, entity_type: &EntityType) -> Option<String> {
        let (curie, rule) = match concept_to_curie(concept_id, entity_type) {
            Some(c) => c,
            None => {
                self.invalid += 1;
                return None;
            }
        };

        let label = match rule {
            Rule::Curie => return Some(curie),
            Rule::Numeric if entity_type.has_known_prefix() => format!(
                "{}->{}",
                entity_type,
                entity_type.numeric_prefix()
            ),
            Rule::Numeric => {
                self.unknown.insert(curie.clone());
                format!("{}->UNKNOWN", entity_type)
            }
            Rule::Cellosaurus => "CVCL_->Cellosaurus".to_string(),
            Rule::Other => {
                self.unknown.insert(format!(
                    "OTHER_{}:{}",
                    entity_type.to_string().to_uppercase(),
                    concept_id
                ));
                format!("{}->OTHER", entity_type)
            }
        };

        let count = self.counts.entry(label).or_default();
        *count += 1;
        if rule == Rule::Numeric && !entity_type.has_known_prefix() {
            let limit = entity_type.warn_limit();
            if *count <= limit {
                warn!(
                    "UNKNOWN {} number #{}: {} -> {}",
                    entity_type, count, concept_id, curie
                );
            } else if *count == limit + 1 {
                warn!("... (suppressing further UNKNOWN {} examples)", entity_type);
            }
        }

        Some(curie)
    }

    /// Construction histogram, keyed by `Type->Prefix`.
    pub fn counts(&self) -> &BTreeMap<String, usize> {
        &self.counts
    }

    /// Number of sentinel/blank concept ids seen.
    pub fn invalid(&self) -> usize {
        self.invalid
    }

    /// Values that could not be mapped to a real namespace.
    pub fn unknown(&self) -> &BTreeSet<String> {
        &self.unknown
    }

    /// Reset counters (but not unknown patterns) before a new scan.
    pub fn reset_counts(&mut self) {
        self.counts.clear();
        self.invalid = 0;
    }
}
