/*! Identifier normalization

Batches candidate identifiers through a [crate::api::NormalizationService],
keeping track of failures and of the semantic types of canonical identifiers.
!*/
mod normalizer;
mod types;

pub use normalizer::{KnownPublications, Normalizer};
pub use types::{TypeMetadata, TypeSummary};
