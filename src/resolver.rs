// src/resolver.rs
//! DID resolution interface.
//!
//! Resolution is a pure lookup: DID string in, DID document out. The engine
//! consumes resolution through the [`Resolver`] trait so tests and platform
//! adapters can substitute their own; the HTTP adapter talks to a hosted
//! resolver endpoint. Callers cache resolved documents if they need to.

use crate::error::{SdkError, SdkResult};
use crate::models::did_document::DidDocument;
use async_trait::async_trait;
use serde::Deserialize;

/// Resolves a DID to its document.
#[async_trait]
pub trait Resolver: Send + Sync {
    /// Resolves `did` to a DID document.
    ///
    /// # Errors
    /// `SdkError::Resolver` when the resolver cannot produce a document
    /// (unknown DID, resolver-side failure). Transport failures surface as
    /// the retryable network variants.
    async fn resolve(&self, did: &str) -> SdkResult<DidDocument>;
}

/// Response envelope returned by hosted resolver endpoints.
#[derive(Deserialize, Debug)]
struct ResolutionResult {
    #[serde(rename = "didDocument")]
    did_document: DidDocument,
}

/// [`Resolver`] adapter over a hosted HTTP resolver.
///
/// Issues `GET {endpoint}/{did}` and expects a JSON envelope with a
/// `didDocument` field.
pub struct HttpResolver {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpResolver {
    /// Creates a resolver client for the given endpoint base URL.
    pub fn new(endpoint: impl Into<String>) -> Self {
        HttpResolver {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl Resolver for HttpResolver {
    async fn resolve(&self, did: &str) -> SdkResult<DidDocument> {
        let url = format!("{}/{}", self.endpoint.trim_end_matches('/'), did);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SdkError::ServiceUnreachable(format!("resolver request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SdkError::Resolver(format!(
                "resolution of '{}' failed with status {}",
                did, status
            )));
        }
        let result: ResolutionResult = response
            .json()
            .await
            .map_err(|e| SdkError::Encoding(format!("invalid resolution response: {}", e)))?;
        Ok(result.did_document)
    }
}
