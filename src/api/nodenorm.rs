//! Node normalizer protocol.
//!
//! Request: `{"curies": [...], "conflate": bool, "drug_chemical_conflate": bool}`.
//! Response: an object keyed by submitted identifier, whose values are either `null`
//! or `{"id": {"identifier": "...", ...}, "type": ["biolink:...", ...], ...}`.
use std::collections::HashMap;
use std::time::Duration;

use log::debug;
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::config::ClientConfig;
use crate::error::Error;

use super::RetryingClient;

/// Anything that can resolve a batch of candidate identifiers.
///
/// A missing key or a `None` value both mean "unresolved".
/// An `Err` means the whole batch could not be resolved.
pub trait NormalizationService {
    fn lookup(
        &self,
        candidates: &[String],
    ) -> Result<HashMap<String, Option<NormalizedNode>>, Error>;
}

impl<T: NormalizationService + ?Sized> NormalizationService for &T {
    fn lookup(
        &self,
        candidates: &[String],
    ) -> Result<HashMap<String, Option<NormalizedNode>>, Error> {
        (**self).lookup(candidates)
    }
}

#[derive(Debug, Serialize)]
pub struct NodeNormRequest<'a> {
    pub curies: &'a [String],
    pub conflate: bool,
    pub drug_chemical_conflate: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NodeId {
    #[serde(default)]
    pub identifier: Option<String>,
}

/// Resolution of a single identifier. Only the fields we use are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NormalizedNode {
    #[serde(default)]
    pub id: Option<NodeId>,
    #[serde(rename = "type", default)]
    pub types: Vec<String>,
}

impl NormalizedNode {
    pub fn new(identifier: &str, types: &[&str]) -> Self {
        Self {
            id: Some(NodeId {
                identifier: Some(identifier.to_string()),
            }),
            types: types.iter().map(|t| t.to_string()).collect(),
        }
    }

    /// Canonical identifier, if present and non-empty.
    pub fn canonical(&self) -> Option<&str> {
        self.id
            .as_ref()
            .and_then(|id| id.identifier.as_deref())
            .filter(|id| !id.is_empty())
    }
}

/// HTTP implementation of [NormalizationService].
pub struct NodeNormClient {
    endpoint: Url,
    client: RetryingClient,
    timeout: Duration,
    conflate: bool,
    drug_chemical_conflate: bool,
}

impl NodeNormClient {
    pub fn new(config: &ClientConfig) -> Result<Self, Error> {
        Ok(Self {
            endpoint: Url::parse(&config.endpoint)?,
            client: RetryingClient::new(config)?,
            timeout: config.timeout,
            conflate: config.conflate,
            drug_chemical_conflate: config.drug_chemical_conflate,
        })
    }
}

impl NormalizationService for NodeNormClient {
    fn lookup(
        &self,
        candidates: &[String],
    ) -> Result<HashMap<String, Option<NormalizedNode>>, Error> {
        debug!("POST {} ({} curies)", self.endpoint, candidates.len());
        let payload = NodeNormRequest {
            curies: candidates,
            conflate: self.conflate,
            drug_chemical_conflate: self.drug_chemical_conflate,
        };
        self.client.post(&self.endpoint, &payload, self.timeout)
    }
}
