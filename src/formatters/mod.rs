// src/formatters/mod.rs
//! Response formatters.
//!
//! A formatter turns a response plus its bound claims into one signed token
//! satisfying the counterpart protocol schema. Formatting is pure: it reads
//! the response, serializes already-bound claims, and signs through the key
//! store capability; it performs no network I/O and never mutates its
//! inputs.

pub mod exchange;     // Pairwise exchange formatting
pub mod issuance;     // Issuance response formatting
pub mod presentation; // Presentation response formatting

use crate::crypto::key_store::KeyStore;
use crate::error::SdkResult;
use crate::models::identifier::Identifier;
use crate::token::jws::{JwsHeader, JwsToken};
use crate::utils::constants::{ALGORITHM_ES256K, DEFAULT_EXPIRATION_IN_SECONDS};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Attestation bindings carried inside a formatted response.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct AttestationResponseClaims {
    /// Self-attested claim values by claim name.
    #[serde(default, rename = "selfIssued", skip_serializing_if = "HashMap::is_empty")]
    pub self_issued: HashMap<String, String>,

    /// Raw id tokens by OIDC configuration URL.
    #[serde(default, rename = "idTokens", skip_serializing_if = "HashMap::is_empty")]
    pub id_tokens: HashMap<String, String>,

    /// Verifiable presentation tokens, keyed by requested credential type
    /// (issuance) or input descriptor id (presentation).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub presentations: HashMap<String, String>,
}

/// Payload of a verifiable presentation token wrapping one credential.
#[derive(Serialize, Deserialize, Debug, Clone)]
struct VpTokenClaims {
    iss: String,
    aud: String,
    jti: String,
    iat: i64,
    exp: i64,
    vp: VpClaims,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
struct VpClaims {
    #[serde(rename = "@context")]
    context: Vec<String>,
    #[serde(rename = "type")]
    presentation_type: Vec<String>,
    #[serde(rename = "verifiableCredential")]
    verifiable_credential: Vec<String>,
}

/// Signs a claim set into a compact token on behalf of `responder`.
///
/// The header's `kid` is the responder's `did#fragment` signing key
/// reference, so verifiers resolve the responder's DID document to check
/// the signature.
pub(crate) fn sign_claims<T: Serialize>(
    claims: &T,
    responder: &Identifier,
    key_store: &Arc<dyn KeyStore>,
) -> SdkResult<String> {
    let header = JwsHeader {
        alg: ALGORITHM_ES256K.to_string(),
        kid: Some(responder.signing_kid()),
        typ: Some("JWT".to_string()),
    };
    let token = JwsToken::sign(header, claims, &responder.signature_key_ref, key_store.as_ref())?;
    Ok(token.encode())
}

/// Wraps one raw credential token in a signed verifiable presentation.
pub(crate) fn wrap_in_presentation(
    raw_credential: &str,
    audience: &str,
    responder: &Identifier,
    expiry_in_seconds: i64,
    key_store: &Arc<dyn KeyStore>,
) -> SdkResult<String> {
    let (iat, exp) = issued_and_expiry(expiry_in_seconds);
    let claims = VpTokenClaims {
        iss: responder.id.clone(),
        aud: audience.to_string(),
        jti: Uuid::new_v4().to_string(),
        iat,
        exp,
        vp: VpClaims {
            context: vec!["https://www.w3.org/2018/credentials/v1".to_string()],
            presentation_type: vec!["VerifiablePresentation".to_string()],
            verifiable_credential: vec![raw_credential.to_string()],
        },
    };
    sign_claims(&claims, responder, key_store)
}

/// Issued-at and expiry timestamps for a token minted now.
pub(crate) fn issued_and_expiry(expiry_in_seconds: i64) -> (i64, i64) {
    let iat = Utc::now().timestamp();
    let expiry = if expiry_in_seconds > 0 { expiry_in_seconds } else { DEFAULT_EXPIRATION_IN_SECONDS };
    (iat, iat + expiry)
}
