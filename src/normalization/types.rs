//! Semantic type tags of canonical identifiers.
use std::collections::{BTreeMap, HashMap};

use log::debug;
use serde::ser::Serializer;
use serde::Serialize;

/// canonical identifier -> type tags, as returned by the service.
///
/// The first tag set captured for a canonical identifier is kept.
/// Later, differing tag sets are ignored (and logged at debug level).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TypeMetadata {
    classes: BTreeMap<String, Vec<String>>,
}

impl TypeMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture `types` for `canonical`. Empty tag sets are not recorded.
    ///
    /// Returns true if the tags were stored.
    pub fn record(&mut self, canonical: &str, types: &[String]) -> bool {
        if types.is_empty() {
            return false;
        }
        match self.classes.get(canonical) {
            Some(existing) => {
                if existing.as_slice() != types {
                    debug!(
                        "keeping first type tags for {}: {:?} (ignoring {:?})",
                        canonical, existing, types
                    );
                }
                false
            }
            None => {
                debug!("Captured biolink classes for {}: {:?}", canonical, types);
                self.classes.insert(canonical.to_string(), types.to_vec());
                true
            }
        }
    }

    pub fn get(&self, canonical: &str) -> Option<&[String]> {
        self.classes.get(canonical).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn clear(&mut self) {
        self.classes.clear()
    }

    /// Number of canonical identifiers per tag, most frequent first.
    /// Ties are ordered by tag name so that output is stable.
    pub fn distribution(&self) -> Vec<(String, usize)> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for tag in self.classes.values().flatten() {
            *counts.entry(tag.as_str()).or_default() += 1;
        }

        let mut counts: Vec<(String, usize)> = counts
            .into_iter()
            .map(|(tag, count)| (tag.to_string(), count))
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        counts
    }

    /// Serializable document written at the end of a run.
    pub fn summary(&self) -> TypeSummary<'_> {
        TypeSummary {
            total_normalized_curies: self.classes.len(),
            curie_to_classes: &self.classes,
            class_distribution: self.distribution(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TypeSummary<'a> {
    pub total_normalized_curies: usize,
    pub curie_to_classes: &'a BTreeMap<String, Vec<String>>,
    /// written as a JSON object whose keys keep the frequency order.
    #[serde(serialize_with = "ordered_map")]
    pub class_distribution: Vec<(String, usize)>,
}

fn ordered_map<S: Serializer>(entries: &[(String, usize)], s: S) -> Result<S::Ok, S::Error> {
    s.collect_map(entries.iter().map(|(k, v)| (k, v)))
}
