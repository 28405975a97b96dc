/*! Candidate identifier construction

Upstream sources do not all speak CURIEs:
- PubTator gives bare numbers whose prefix depends on the annotation type ([pubtator]),
- OmniCorp gives ontology IRIs ([iri]).

Both builders keep a histogram of the rules they applied, and the set of values
they could not map to a known prefix ("unknown patterns"), to extend the tables later.
!*/
pub mod iri;
pub mod pubtator;

pub use iri::IriConverter;
pub use pubtator::{ConceptBuilder, EntityType};

/// Extract the PMID of a PubMed url (`https://www.ncbi.nlm.nih.gov/pubmed/3963809`).
pub fn pmid_from_url(url: &str) -> Option<u64> {
    let (_, tail) = url.rsplit_once("/pubmed/")?;
    if tail.is_empty() || !tail.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    tail.parse().ok()
}
