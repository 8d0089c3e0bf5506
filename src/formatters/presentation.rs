// src/formatters/presentation.rs
//! Presentation response formatting.

use crate::crypto::key_store::KeyStore;
use crate::error::SdkResult;
use crate::formatters::{
    issued_and_expiry, sign_claims, wrap_in_presentation, AttestationResponseClaims,
};
use crate::models::identifier::Identifier;
use crate::service::response::{PresentationResponse, RequestedVchPresentationSubmissionMap};
use crate::utils::constants::SELF_ISSUED;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Payload of a formatted presentation response token.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PresentationResponseClaims {
    /// Always the self-issued issuer URL.
    pub iss: String,

    /// DID of the responder.
    pub sub: String,

    /// Relying-party redirect URL the response is addressed to.
    pub aud: String,

    /// DID of the responder, duplicated for DID-authn consumers.
    pub did: String,

    /// Nonce echoed from the request.
    pub nonce: String,

    /// Opaque state echoed from the request, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    pub jti: String,
    pub iat: i64,
    pub exp: i64,

    /// Bound attestation values; only presentations for this response kind.
    #[serde(default)]
    pub attestations: AttestationResponseClaims,

    /// Where each requested descriptor's presentation lives in this token.
    #[serde(rename = "presentation_submission")]
    pub presentation_submission: PresentationSubmission,
}

/// Presentation-exchange submission descriptor.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct PresentationSubmission {
    pub id: String,

    #[serde(rename = "descriptor_map")]
    pub descriptor_map: Vec<DescriptorMapEntry>,
}

/// Maps one input descriptor to the path of its presentation token.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DescriptorMapEntry {
    /// Input descriptor id from the request.
    pub id: String,

    /// Token format; always a signed verifiable presentation here.
    pub format: String,

    /// JSONPath of the presentation inside the response payload.
    pub path: String,
}

/// Formats a [`PresentationResponse`] into one signed token posted back to
/// the relying party.
pub struct PresentationResponseFormatter {
    key_store: Arc<dyn KeyStore>,
}

impl PresentationResponseFormatter {
    pub fn new(key_store: Arc<dyn KeyStore>) -> Self {
        PresentationResponseFormatter { key_store }
    }

    /// Formats and signs the response on behalf of `responder`.
    ///
    /// The request's nonce and state are echoed back verbatim so the relying
    /// party can correlate the response with its request.
    pub fn format_response(
        &self,
        response: &PresentationResponse,
        requested_vch_map: &RequestedVchPresentationSubmissionMap,
        responder: &Identifier,
        expiry_in_seconds: i64,
    ) -> SdkResult<String> {
        let (iat, exp) = issued_and_expiry(expiry_in_seconds);

        let mut presentations = HashMap::new();
        let mut descriptor_map = Vec::new();
        for (descriptor, holder) in requested_vch_map {
            let vp = wrap_in_presentation(
                &holder.verifiable_credential.raw,
                &response.audience,
                responder,
                expiry_in_seconds,
                &self.key_store,
            )?;
            descriptor_map.push(DescriptorMapEntry {
                id: descriptor.id.clone(),
                format: "jwt_vp".to_string(),
                path: format!("$.attestations.presentations.{}", descriptor.id),
            });
            presentations.insert(descriptor.id.clone(), vp);
        }

        let claims = PresentationResponseClaims {
            iss: SELF_ISSUED.to_string(),
            sub: responder.id.clone(),
            aud: response.audience.clone(),
            did: responder.id.clone(),
            nonce: response.request.content.nonce.clone(),
            state: response.request.content.state.clone(),
            jti: Uuid::new_v4().to_string(),
            iat,
            exp,
            attestations: AttestationResponseClaims {
                presentations,
                ..AttestationResponseClaims::default()
            },
            presentation_submission: PresentationSubmission {
                id: Uuid::new_v4().to_string(),
                descriptor_map,
            },
        };
        sign_claims(&claims, responder, &self.key_store)
    }
}
