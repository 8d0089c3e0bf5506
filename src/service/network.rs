// src/service/network.rs
//! Network collaborator interface and HTTP adapter.
//!
//! The engine never talks HTTP directly: fetching contracts and request
//! tokens, and posting signed responses, go through the [`Network`] trait.
//! Every failure maps to one of the retryable network variants; the engine
//! itself never retries, callers decide.

use crate::error::{SdkError, SdkResult};
use crate::models::contract::VerifiableCredentialContract;
use async_trait::async_trait;
use reqwest::StatusCode;

/// Network collaborator consumed by the exchange engine.
#[async_trait]
pub trait Network: Send + Sync {
    /// Fetches a credential contract from an issuer.
    async fn fetch_contract(&self, url: &str) -> SdkResult<VerifiableCredentialContract>;

    /// Dereferences a `request_uri` into a raw request token.
    async fn fetch_request(&self, url: &str) -> SdkResult<String>;

    /// Posts a signed issuance (or exchange) response.
    ///
    /// # Returns
    /// The raw signed credential token issued in reply.
    async fn send_issuance_response(&self, audience: &str, token: &str) -> SdkResult<String>;

    /// Posts a signed presentation response, echoing opaque `state`.
    async fn send_presentation_response(
        &self,
        audience: &str,
        token: &str,
        state: Option<&str>,
    ) -> SdkResult<()>;
}

/// [`Network`] adapter over reqwest.
///
/// Responses are form-posted as `id_token` per the OIDC `form_post`
/// response mode.
pub struct HttpNetworkClient {
    client: reqwest::Client,
}

impl HttpNetworkClient {
    /// Creates an HTTP network client with default settings.
    pub fn new() -> Self {
        HttpNetworkClient { client: reqwest::Client::new() }
    }
}

impl Default for HttpNetworkClient {
    fn default() -> Self {
        Self::new()
    }
}

fn transport_error(context: &str, error: reqwest::Error) -> SdkError {
    SdkError::ServiceUnreachable(format!("{}: {}", context, error))
}

fn status_error(context: &str, status: StatusCode) -> SdkError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            SdkError::Unauthorized(format!("{}: status {}", context, status))
        }
        _ => SdkError::ServiceError(format!("{}: status {}", context, status)),
    }
}

#[async_trait]
impl Network for HttpNetworkClient {
    async fn fetch_contract(&self, url: &str) -> SdkResult<VerifiableCredentialContract> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| transport_error("contract fetch failed", e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(status_error("contract fetch rejected", status));
        }
        response
            .json()
            .await
            .map_err(|e| SdkError::Encoding(format!("invalid contract body: {}", e)))
    }

    async fn fetch_request(&self, url: &str) -> SdkResult<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| transport_error("request fetch failed", e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(status_error("request fetch rejected", status));
        }
        response
            .text()
            .await
            .map_err(|e| SdkError::Encoding(format!("unreadable request body: {}", e)))
    }

    async fn send_issuance_response(&self, audience: &str, token: &str) -> SdkResult<String> {
        let response = self
            .client
            .post(audience)
            .form(&[("id_token", token)])
            .send()
            .await
            .map_err(|e| transport_error("issuance response send failed", e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(status_error("issuance response rejected", status));
        }
        response
            .text()
            .await
            .map_err(|e| SdkError::Encoding(format!("unreadable issuance reply: {}", e)))
    }

    async fn send_presentation_response(
        &self,
        audience: &str,
        token: &str,
        state: Option<&str>,
    ) -> SdkResult<()> {
        let mut form = vec![("id_token", token)];
        if let Some(state) = state {
            form.push(("state", state));
        }
        let response = self
            .client
            .post(audience)
            .form(&form)
            .send()
            .await
            .map_err(|e| transport_error("presentation response send failed", e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(status_error("presentation response rejected", status));
        }
        Ok(())
    }
}
