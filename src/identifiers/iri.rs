//! Ontology IRI to CURIE conversion.
//!
//! A fixed, ordered table of url shapes. The first matching rule wins,
//! unmatched IRIs are kept unchanged and remembered as unknown.
use std::collections::{BTreeMap, BTreeSet};

use regex::Regex;

use crate::error::Error;

/// (label, pattern, replacement). Label and replacement are expanded with the pattern captures.
const IRI_PATTERNS: &[(&str, &str, &str)] = &[
    ("CHEBI", r"purl\.obolibrary\.org/obo/CHEBI_(\d+)", "CHEBI:${1}"),
    ("MESH", r"id\.nlm\.nih\.gov/mesh/(\S+)$", "MESH:${1}"),
    // generic OBO term, e.g. RO_0002432, MONDO_0004976
    ("${1}", r"purl\.obolibrary\.org/obo/([A-Z]+)_(\d+)", "${1}:${2}"),
    ("NCBITaxon", r"purl\.obolibrary\.org/obo/NCBITaxon_(\d+)", "NCBITaxon:${1}"),
    ("NCIT", r"purl\.obolibrary\.org/obo/NCIT_(C\d+)", "NCIT:${1}"),
    ("PR", r"purl\.obolibrary\.org/obo/PR_([A-Z0-9_]+)", "PR:${1}"),
    ("dictyBase", r"dictybase\.org/gene/(\S+)$", "dictyBase:${1}"),
    ("FB", r"flybase\.org/reports/(\S+)$", "FB:${1}"),
    ("HGNC", r"identifiers\.org/hgnc/(\S+)$", "HGNC:${1}"),
    (
        "HGNC",
        r"genenames\.org/cgi-bin/gene_symbol_report\?hgnc_id=(\d+)",
        "HGNC:${1}",
    ),
    (
        "HGNC",
        r"genenames\.org/data/gene-symbol-report/#!/hgnc_id/HGNC:(\d+)",
        "HGNC:${1}",
    ),
    (
        "RGD",
        r"rgd\.mcw\.edu/rgdweb/report/gene/main\.html\?id=(\d+)",
        "RGD:${1}",
    ),
    ("EFO", r"ebi\.ac\.uk/efo/EFO_(\S+)$", "EFO:${1}"),
    // the local part already carries the prefix
    ("MGI", r"informatics\.jax\.org/marker/(MGI:\S+)$", "${1}"),
    ("NCBIGene", r"ncbi\.nlm\.nih\.gov/gene/(\S+)$", "NCBIGene:${1}"),
    ("orphanet", r"orpha\.net/ORDO/Orphanet_(\d+)", "orphanet:${1}"),
    (
        "WormBase",
        r"wormbase\.org/species/c_elegans/gene/(WBGene\d+)",
        "WormBase:${1}",
    ),
    ("SGD", r"yeastgenome\.org/locus/(\S+)$", "SGD:${1}"),
    ("ZFIN", r"zfin\.org/action/marker/view/(\S+)$", "ZFIN:${1}"),
];

/// Histogram label of unmatched IRIs.
const UNKNOWN: &str = "UNKNOWN";

#[derive(Debug)]
struct IriRule {
    label: &'static str,
    pattern: Regex,
    replacement: &'static str,
}

/// Converts IRIs, keeping a per-prefix histogram and the set of unmatched IRIs.
#[derive(Debug)]
pub struct IriConverter {
    rules: Vec<IriRule>,
    counts: BTreeMap<String, usize>,
    unknown: BTreeSet<String>,
}

impl IriConverter {
    pub fn new() -> Result<Self, Error> {
        let rules = IRI_PATTERNS
            .iter()
            .map(|&(label, pattern, replacement)| -> Result<IriRule, Error> {
                Ok(IriRule {
                    label,
                    pattern: Regex::new(pattern)?,
                    replacement,
                })
            })
            .collect::<Result<Vec<_>, Error>>()?;

        Ok(Self {
            rules,
            counts: BTreeMap::new(),
            unknown: BTreeSet::new(),
        })
    }

    /// Pure lookup: (label, curie) of the first matching rule.
    pub fn lookup(&self, iri: &str) -> Option<(String, String)> {
        self.rules.iter().find_map(|rule| {
            rule.pattern.captures(iri).map(|caps| {
                let mut label = String::new();
                let mut curie = String::new();
                caps.expand(rule.label, &mut label);
                caps.expand(rule.replacement, &mut curie);
                (label, curie)
            })
        })
    }

    /// Convert `iri`, returning it unchanged (and remembering it) if no rule matches.
    pub fn convert(&mut self, iri: &str) -> String {
        match self.lookup(iri) {
            Some((label, curie)) => {
                *self.counts.entry(label).or_default() += 1;
                curie
            }
            None => {
                *self.counts.entry(UNKNOWN.to_string()).or_default() += 1;
                self.unknown.insert(iri.to_string());
                iri.to_string()
            }
        }
    }

    /// Conversion histogram, keyed by prefix.
    pub fn counts(&self) -> &BTreeMap<String, usize> {
        &self.counts
    }

    /// IRIs no rule matched.
    pub fn unknown(&self) -> &BTreeSet<String> {
        &self.unknown
    }

    pub fn reset_counts(&mut self) {
        self.counts.clear();
    }
}
