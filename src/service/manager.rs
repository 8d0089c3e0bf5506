// src/service/manager.rs
//! The verifiable credential exchange engine.
//!
//! [`VerifiableCredentialManager`] drives both protocol flows end to end:
//! parse and validate an incoming request, let the caller bind claims on a
//! response, then exchange, format, send, and persist. Each send is
//! sequential and short-circuits on first failure; nothing is persisted
//! unless the network send succeeded, with one deliberate exception: a
//! pairwise-exchanged credential is persisted as soon as its own exchange
//! succeeds, so a later failure of the outer send never repeats the
//! exchange.
//!
//! The engine holds no per-flow state. All collaborators are injected and
//! shared; concurrent calls on one manager are safe.

use crate::crypto::key_store::KeyStore;
use crate::error::{SdkError, SdkResult};
use crate::formatters::exchange::ExchangeResponseFormatter;
use crate::formatters::issuance::IssuanceResponseFormatter;
use crate::formatters::presentation::PresentationResponseFormatter;
use crate::models::credential::{
    ExchangeRequest, VerifiableCredential, VerifiableCredentialHolder,
};
use crate::models::identifier::Identifier;
use crate::models::oidc::OidcRequestContent;
use crate::models::receipt::{Receipt, ReceiptAction};
use crate::service::network::Network;
use crate::service::repository::Repository;
use crate::service::request::{IssuanceRequest, PresentationRequest};
use crate::service::response::{IssuanceResponse, PresentationResponse};
use crate::token::jws::JwsToken;
use crate::utils::constants::{DEEP_LINK_HOST, DEEP_LINK_SCHEME};
use crate::validators::presentation_request::PresentationRequestValidator;
use log::{debug, info};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use url::Url;

/// Exchange engine over injected collaborators.
pub struct VerifiableCredentialManager {
    repository: Arc<dyn Repository>,
    network: Arc<dyn Network>,
    request_validator: Arc<PresentationRequestValidator>,
    issuance_formatter: IssuanceResponseFormatter,
    presentation_formatter: PresentationResponseFormatter,
    exchange_formatter: ExchangeResponseFormatter,
}

impl VerifiableCredentialManager {
    /// Creates a manager; formatters sign through the given key store.
    pub fn new(
        repository: Arc<dyn Repository>,
        network: Arc<dyn Network>,
        request_validator: Arc<PresentationRequestValidator>,
        key_store: Arc<dyn KeyStore>,
    ) -> Self {
        VerifiableCredentialManager {
            repository,
            network,
            request_validator,
            issuance_formatter: IssuanceResponseFormatter::new(key_store.clone()),
            presentation_formatter: PresentationResponseFormatter::new(key_store.clone()),
            exchange_formatter: ExchangeResponseFormatter::new(key_store),
        }
    }

    /// Parses and validates a presentation request from a deep link.
    ///
    /// The link must be `openid://vc` with either the request token inline
    /// in a `request` parameter or a `request_uri` to dereference.
    ///
    /// # Errors
    /// `SdkError::Presentation` for malformed links; validation failures
    /// propagate from [`PresentationRequestValidator`].
    pub async fn get_presentation_request(&self, uri: &str) -> SdkResult<PresentationRequest> {
        let url = Url::parse(uri)
            .map_err(|e| SdkError::Presentation(format!("malformed request url: {}", e)))?;
        if url.scheme() != DEEP_LINK_SCHEME || url.host_str() != Some(DEEP_LINK_HOST) {
            return Err(SdkError::Presentation(format!(
                "unsupported request url '{}', expected scheme '{}://{}'",
                uri, DEEP_LINK_SCHEME, DEEP_LINK_HOST
            )));
        }

        let mut inline_request = None;
        let mut request_uri = None;
        for (name, value) in url.query_pairs() {
            match name.as_ref() {
                "request" => inline_request = Some(value.into_owned()),
                "request_uri" => request_uri = Some(value.into_owned()),
                _ => {}
            }
        }
        let raw_token = match (inline_request, request_uri) {
            (Some(token), _) => token,
            (None, Some(uri)) => self.network.fetch_request(&uri).await?,
            (None, None) => {
                return Err(SdkError::Presentation(
                    "request url has no 'request' or 'request_uri' query parameter".to_string(),
                ))
            }
        };

        let token = JwsToken::decode(&raw_token)?;
        let content: OidcRequestContent = token.content()?;
        let request = PresentationRequest::new(raw_token, content);
        self.request_validator.validate(&request).await?;
        info!("presentation request from {} validated", request.entity_identifier());
        Ok(request)
    }

    /// Fetches a contract and builds the issuance request it offers.
    pub async fn get_issuance_request(&self, contract_url: &str) -> SdkResult<IssuanceRequest> {
        let contract = self.network.fetch_contract(contract_url).await?;
        Ok(IssuanceRequest::new(contract, contract_url.to_string()))
    }

    /// Starts an empty response to an issuance request.
    pub fn create_issuance_response(&self, request: IssuanceRequest) -> IssuanceResponse {
        IssuanceResponse::new(request)
    }

    /// Starts an empty response to a presentation request.
    pub fn create_presentation_response(&self, request: PresentationRequest) -> PresentationResponse {
        PresentationResponse::new(request)
    }

    /// Formats and sends an issuance response, then persists the issued
    /// credential, its holder wrapper, and an issuance receipt.
    ///
    /// When `pairwise` is given, every bound credential is first exchanged
    /// to that identifier and the response is signed by it, so the issuer
    /// only ever sees the pairwise DID.
    pub async fn send_issuance_response(
        &self,
        response: &IssuanceResponse,
        responder: &Identifier,
        pairwise: Option<&Identifier>,
        expiry_in_seconds: i64,
    ) -> SdkResult<VerifiableCredentialHolder> {
        let signer = pairwise.unwrap_or(responder);
        let vch_map = match pairwise {
            Some(pairwise) => {
                self.exchange_requested_vchs(response.requested_vchs(), pairwise, expiry_in_seconds)
                    .await?
            }
            None => response.requested_vchs().clone(),
        };
        let token = self.issuance_formatter.format_response(
            response,
            &vch_map,
            signer,
            expiry_in_seconds,
        )?;
        let raw_credential = self.network.send_issuance_response(&response.audience, &token).await?;

        let credential = VerifiableCredential::from_raw(&raw_credential, None)?;
        let holder = VerifiableCredentialHolder {
            card_id: credential.jti.clone(),
            verifiable_credential: credential.clone(),
            owner: signer.clone(),
            display_contract: response.request.contract.display.clone(),
        };
        self.repository.insert_credential(credential).await?;
        self.repository.insert_holder(holder.clone()).await?;
        self.repository
            .insert_receipt(Receipt::new(
                ReceiptAction::Issuance,
                &holder.card_id,
                response.request.entity_identifier(),
                response.request.entity_name(),
            ))
            .await?;
        info!("issued credential {} from {}", holder.card_id, response.request.entity_identifier());
        Ok(holder)
    }

    /// Formats and sends a presentation response, then records one
    /// presentation receipt per credential shown.
    pub async fn send_presentation_response(
        &self,
        response: &PresentationResponse,
        responder: &Identifier,
        pairwise: Option<&Identifier>,
        expiry_in_seconds: i64,
    ) -> SdkResult<()> {
        let signer = pairwise.unwrap_or(responder);
        let vch_map = match pairwise {
            Some(pairwise) => {
                self.exchange_requested_vchs(response.requested_vchs(), pairwise, expiry_in_seconds)
                    .await?
            }
            None => response.requested_vchs().clone(),
        };
        let token = self.presentation_formatter.format_response(
            response,
            &vch_map,
            signer,
            expiry_in_seconds,
        )?;
        self.network
            .send_presentation_response(
                &response.audience,
                &token,
                response.request.content.state.as_deref(),
            )
            .await?;

        for receipt in response.create_receipts() {
            self.repository.insert_receipt(receipt).await?;
        }
        info!("presented credentials to {}", response.request.entity_identifier());
        Ok(())
    }

    /// Exchanges every credential in a bound map to the pairwise
    /// identifier, preserving the map's keys.
    async fn exchange_requested_vchs<K>(
        &self,
        vch_map: &HashMap<K, VerifiableCredentialHolder>,
        pairwise: &Identifier,
        expiry_in_seconds: i64,
    ) -> SdkResult<HashMap<K, VerifiableCredentialHolder>>
    where
        K: Clone + Eq + Hash,
    {
        let mut exchanged = HashMap::new();
        for (key, holder) in vch_map {
            let credential =
                self.get_exchanged_credential(holder, pairwise, expiry_in_seconds).await?;
            exchanged.insert(key.clone(), holder.with_credential(credential));
        }
        Ok(exchanged)
    }

    /// Returns a copy of the holder's credential bound to the pairwise DID,
    /// reusing a previously exchanged copy when one is stored.
    pub async fn get_exchanged_credential(
        &self,
        holder: &VerifiableCredentialHolder,
        pairwise: &Identifier,
        expiry_in_seconds: i64,
    ) -> SdkResult<VerifiableCredential> {
        let pic_id = &holder.verifiable_credential.pic_id;
        let stored = self.repository.get_credentials_by_pic_id(pic_id).await?;
        if let Some(cached) = stored.into_iter().find(|c| c.contents.sub == pairwise.id) {
            debug!("exchange cache hit for {} -> {}", pic_id, pairwise.id);
            return Ok(cached);
        }
        debug!("exchange cache miss for {} -> {}", pic_id, pairwise.id);
        self.send_exchange_request(
            ExchangeRequest::new(
                holder.verifiable_credential.clone(),
                pairwise.id.clone(),
                holder.owner.clone(),
            ),
            expiry_in_seconds,
        )
        .await
    }

    /// Sends an exchange request and persists the re-issued credential.
    ///
    /// # Errors
    /// `SdkError::Exchange` before any network call when the credential
    /// advertises no exchange endpoint.
    pub async fn send_exchange_request(
        &self,
        request: ExchangeRequest,
        expiry_in_seconds: i64,
    ) -> SdkResult<VerifiableCredential> {
        if request.audience.is_empty() {
            return Err(SdkError::Exchange("audience is an empty string".to_string()));
        }
        let token = self.exchange_formatter.format_response(&request, expiry_in_seconds)?;
        let raw = self.network.send_issuance_response(&request.audience, &token).await?;
        let credential =
            VerifiableCredential::from_raw(&raw, Some(request.verifiable_credential.pic_id))?;
        self.repository.insert_credential(credential.clone()).await?;
        Ok(credential)
    }

    /// Returns all stored credential holders.
    pub async fn get_verifiable_credential_holders(
        &self,
    ) -> SdkResult<Vec<VerifiableCredentialHolder>> {
        self.repository.query_all_holders().await
    }

    /// Returns one stored holder by card id.
    pub async fn get_holder_by_id(
        &self,
        card_id: &str,
    ) -> SdkResult<Option<VerifiableCredentialHolder>> {
        self.repository.get_holder(card_id).await
    }

    /// Returns stored holders whose credential carries the given type.
    pub async fn get_holders_by_credential_type(
        &self,
        credential_type: &str,
    ) -> SdkResult<Vec<VerifiableCredentialHolder>> {
        let holders = self.repository.query_all_holders().await?;
        Ok(holders
            .into_iter()
            .filter(|holder| {
                holder
                    .verifiable_credential
                    .contents
                    .vc
                    .credential_type
                    .iter()
                    .any(|t| t == credential_type)
            })
            .collect())
    }

    /// Returns the activity receipts recorded for a credential.
    pub async fn get_receipts_by_vc_id(&self, vc_id: &str) -> SdkResult<Vec<Receipt>> {
        self.repository.get_receipts_by_vc_id(vc_id).await
    }

    /// Stores or replaces a holder.
    pub async fn save_holder(&self, holder: VerifiableCredentialHolder) -> SdkResult<()> {
        self.repository.insert_holder(holder).await
    }

    /// Deletes a holder by card id.
    pub async fn delete_holder(&self, card_id: &str) -> SdkResult<()> {
        self.repository.delete_holder(card_id).await
    }
}
