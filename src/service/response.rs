// src/service/response.rs
//! Issuance and presentation responses.
//!
//! A response is built incrementally by the caller: credentials, id tokens,
//! and self-attested claims are bound to the attestations that requested
//! them, accumulating in maps owned by the response. The maps are not
//! thread-safe; a response belongs to a single caller for the lifetime of
//! one exchange and is consumed exactly once by a formatter.

use crate::models::attestations::{IdTokenAttestation, PresentationAttestation};
use crate::models::credential::VerifiableCredentialHolder;
use crate::models::oidc::InputDescriptor;
use crate::models::receipt::{Receipt, ReceiptAction};
use crate::service::request::{IssuanceRequest, PresentationRequest};
use std::collections::HashMap;

/// Credentials bound to the presentation attestations that requested them.
pub type RequestedVchMap = HashMap<PresentationAttestation, VerifiableCredentialHolder>;

/// Raw id tokens bound by OIDC configuration URL.
pub type RequestedIdTokenMap = HashMap<String, String>;

/// Self-attested claim values bound by claim name.
pub type RequestedSelfAttestedClaimMap = HashMap<String, String>;

/// Credentials bound to presentation-exchange input descriptors.
pub type RequestedVchPresentationSubmissionMap =
    HashMap<InputDescriptor, VerifiableCredentialHolder>;

/// Response to an issuance request, accumulating claim bindings.
#[derive(Debug, Clone)]
pub struct IssuanceResponse {
    /// The request this response answers.
    pub request: IssuanceRequest,

    /// Entity the response is sent to.
    pub audience: String,

    requested_vch_map: RequestedVchMap,
    requested_id_token_map: RequestedIdTokenMap,
    requested_self_attested_claim_map: RequestedSelfAttestedClaimMap,
}

impl IssuanceResponse {
    /// Creates an empty response; the audience is the contract's issuer
    /// endpoint.
    pub fn new(request: IssuanceRequest) -> Self {
        let audience = request.audience().to_string();
        IssuanceResponse {
            request,
            audience,
            requested_vch_map: HashMap::new(),
            requested_id_token_map: HashMap::new(),
            requested_self_attested_claim_map: HashMap::new(),
        }
    }

    /// Binds an id token to the attestation that requested it.
    pub fn add_requested_id_token(&mut self, attestation: &IdTokenAttestation, raw_token: String) {
        self.requested_id_token_map.insert(attestation.configuration.clone(), raw_token);
    }

    /// Binds a self-attested claim value.
    pub fn add_requested_self_attested_claim(&mut self, field: String, claim: String) {
        self.requested_self_attested_claim_map.insert(field, claim);
    }

    /// Binds a held credential to the attestation that requested it.
    pub fn add_requested_vch(
        &mut self,
        attestation: PresentationAttestation,
        holder: VerifiableCredentialHolder,
    ) {
        self.requested_vch_map.insert(attestation, holder);
    }

    /// The bound credentials.
    pub fn requested_vchs(&self) -> &RequestedVchMap {
        &self.requested_vch_map
    }

    /// The bound id tokens.
    pub fn requested_id_tokens(&self) -> &RequestedIdTokenMap {
        &self.requested_id_token_map
    }

    /// The bound self-attested claims.
    pub fn requested_self_attested_claims(&self) -> &RequestedSelfAttestedClaimMap {
        &self.requested_self_attested_claim_map
    }
}

/// Response to a presentation request, accumulating claim bindings.
#[derive(Debug, Clone)]
pub struct PresentationResponse {
    /// The request this response answers.
    pub request: PresentationRequest,

    /// Entity the response is sent to.
    pub audience: String,

    requested_vch_submission_map: RequestedVchPresentationSubmissionMap,
}

impl PresentationResponse {
    /// Creates an empty response; the audience is the request's redirect
    /// URL.
    pub fn new(request: PresentationRequest) -> Self {
        let audience = request.audience().to_string();
        PresentationResponse {
            request,
            audience,
            requested_vch_submission_map: HashMap::new(),
        }
    }

    /// Binds a held credential to the descriptor that requested it.
    pub fn add_requested_vch(
        &mut self,
        descriptor: InputDescriptor,
        holder: VerifiableCredentialHolder,
    ) {
        self.requested_vch_submission_map.insert(descriptor, holder);
    }

    /// The bound credentials.
    pub fn requested_vchs(&self) -> &RequestedVchPresentationSubmissionMap {
        &self.requested_vch_submission_map
    }

    /// Builds one presentation receipt per bound credential.
    pub fn create_receipts(&self) -> Vec<Receipt> {
        let entity_did = self.request.entity_identifier();
        let entity_name = self.request.entity_name();
        self.requested_vch_submission_map
            .values()
            .map(|holder| {
                Receipt::new(ReceiptAction::Presentation, &holder.card_id, entity_did, entity_name)
            })
            .collect()
    }
}
