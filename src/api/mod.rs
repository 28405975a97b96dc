/*! Remote normalization service access.

[RetryingClient] is a generic blocking JSON POST wrapper with exponential backoff,
[NodeNormClient] speaks the node normalizer protocol on top of it.
!*/
mod client;
mod nodenorm;

pub use client::{backoff_delay, RetryingClient};
pub use nodenorm::{NodeNormClient, NodeNormRequest, NormalizationService, NormalizedNode};
