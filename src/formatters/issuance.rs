// src/formatters/issuance.rs
//! Issuance response formatting.

use crate::crypto::key_store::KeyStore;
use crate::error::SdkResult;
use crate::formatters::{
    issued_and_expiry, sign_claims, wrap_in_presentation, AttestationResponseClaims,
};
use crate::models::identifier::Identifier;
use crate::service::response::{IssuanceResponse, RequestedVchMap};
use crate::utils::constants::SELF_ISSUED;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Payload of a formatted issuance response token.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct IssuanceResponseClaims {
    /// Always the self-issued issuer URL.
    pub iss: String,

    /// DID of the responder.
    pub sub: String,

    /// Issuer endpoint the response is addressed to.
    pub aud: String,

    /// DID of the responder, duplicated for DID-authn consumers.
    pub did: String,

    /// URL of the contract being answered.
    pub contract: String,

    pub jti: String,
    pub iat: i64,
    pub exp: i64,

    /// Bound attestation values.
    #[serde(default)]
    pub attestations: AttestationResponseClaims,
}

/// Formats an [`IssuanceResponse`] into one signed token the issuer's
/// endpoint accepts.
pub struct IssuanceResponseFormatter {
    key_store: Arc<dyn KeyStore>,
}

impl IssuanceResponseFormatter {
    pub fn new(key_store: Arc<dyn KeyStore>) -> Self {
        IssuanceResponseFormatter { key_store }
    }

    /// Formats and signs the response on behalf of `responder`.
    ///
    /// # Arguments
    /// * `response` - The response with its bound id tokens and claims
    /// * `requested_vch_map` - Credential bindings to present, already
    ///   exchanged to the DID this response is issued under
    /// * `responder` - Identifier that signs the response
    /// * `expiry_in_seconds` - Token lifetime
    pub fn format_response(
        &self,
        response: &IssuanceResponse,
        requested_vch_map: &RequestedVchMap,
        responder: &Identifier,
        expiry_in_seconds: i64,
    ) -> SdkResult<String> {
        let (iat, exp) = issued_and_expiry(expiry_in_seconds);

        let mut presentations = HashMap::new();
        for (attestation, holder) in requested_vch_map {
            let vp = wrap_in_presentation(
                &holder.verifiable_credential.raw,
                &response.audience,
                responder,
                expiry_in_seconds,
                &self.key_store,
            )?;
            presentations.insert(attestation.credential_type.clone(), vp);
        }

        let claims = IssuanceResponseClaims {
            iss: SELF_ISSUED.to_string(),
            sub: responder.id.clone(),
            aud: response.audience.clone(),
            did: responder.id.clone(),
            contract: response.request.contract_url.clone(),
            jti: Uuid::new_v4().to_string(),
            iat,
            exp,
            attestations: AttestationResponseClaims {
                self_issued: response.requested_self_attested_claims().clone(),
                id_tokens: response.requested_id_tokens().clone(),
                presentations,
            },
        };
        sign_claims(&claims, responder, &self.key_store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::key_store::InMemoryKeyStore;
    use crate::models::attestations::PresentationAttestation;
    use crate::models::contract::VerifiableCredentialContract;
    use crate::models::credential::{
        VerifiableCredential, VerifiableCredentialContent, VerifiableCredentialHolder,
    };
    use crate::service::request::IssuanceRequest;
    use crate::token::jws::JwsToken;

    fn responder() -> Identifier {
        Identifier {
            id: "did:ion:holder".to_string(),
            name: "primary".to_string(),
            signature_key_ref: "sig_holder".to_string(),
            encryption_key_ref: "enc".to_string(),
            recovery_key_ref: "rec".to_string(),
        }
    }

    fn key_store() -> Arc<dyn KeyStore> {
        let store = InMemoryKeyStore::new();
        store.generate_signing_key("sig_holder", "sig_h").unwrap();
        Arc::new(store)
    }

    fn response() -> IssuanceResponse {
        let mut contract = VerifiableCredentialContract::default();
        contract.input.credential_issuer = "https://issuer.example/issue".to_string();
        IssuanceResponse::new(IssuanceRequest::new(
            contract,
            "https://issuer.example/contracts/1".to_string(),
        ))
    }

    #[test]
    fn test_formatted_response_is_self_issued_and_audience_bound() {
        let formatter = IssuanceResponseFormatter::new(key_store());
        let mut response = response();
        response.add_requested_self_attested_claim("email".to_string(), "a@b.c".to_string());

        let token = formatter
            .format_response(&response, &RequestedVchMap::new(), &responder(), 3600)
            .unwrap();
        let claims: IssuanceResponseClaims =
            JwsToken::decode(&token).unwrap().content().unwrap();

        assert_eq!(claims.iss, SELF_ISSUED);
        assert_eq!(claims.sub, "did:ion:holder");
        assert_eq!(claims.did, "did:ion:holder");
        assert_eq!(claims.aud, "https://issuer.example/issue");
        assert_eq!(claims.contract, "https://issuer.example/contracts/1");
        assert_eq!(claims.attestations.self_issued["email"], "a@b.c");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_bound_credentials_are_wrapped_as_presentations_by_type() {
        let formatter = IssuanceResponseFormatter::new(key_store());
        let mut map = RequestedVchMap::new();
        map.insert(
            PresentationAttestation {
                credential_type: "ProofOfEmployment".to_string(),
                claims: vec![],
                required: true,
            },
            VerifiableCredentialHolder {
                card_id: "vc-1".to_string(),
                verifiable_credential: VerifiableCredential {
                    jti: "vc-1".to_string(),
                    raw: "a.b.c".to_string(),
                    contents: VerifiableCredentialContent::default(),
                    pic_id: "vc-1".to_string(),
                },
                owner: responder(),
                display_contract: Default::default(),
            },
        );

        let token = formatter.format_response(&response(), &map, &responder(), 3600).unwrap();
        let claims: IssuanceResponseClaims =
            JwsToken::decode(&token).unwrap().content().unwrap();

        let vp = &claims.attestations.presentations["ProofOfEmployment"];
        let vp_token = JwsToken::decode(vp).unwrap();
        assert_eq!(vp_token.kid(), Some("did:ion:holder#sig_holder"));
        let vp_claims: serde_json::Value = vp_token.content().unwrap();
        assert_eq!(vp_claims["vp"]["verifiableCredential"][0], "a.b.c");
    }
}
