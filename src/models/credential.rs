// src/models/credential.rs
//! Verifiable credential data model.
//!
//! A credential arrives as a raw signed token; this module pairs the raw
//! form (needed for re-presentation and exchange) with its parsed claim
//! contents, and defines the holder-side wrapper persisted to storage.

use crate::error::SdkResult;
use crate::models::contract::DisplayContract;
use crate::models::identifier::Identifier;
use crate::token::jws::JwsToken;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Parsed payload of a signed verifiable credential token.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct VerifiableCredentialContent {
    /// Token id; credentials are content-addressed by this value.
    #[serde(default)]
    pub jti: String,

    /// DID of the issuer.
    #[serde(default)]
    pub iss: String,

    /// DID of the subject the claims are about.
    #[serde(default)]
    pub sub: String,

    /// Issued-at, seconds since epoch.
    #[serde(default)]
    pub iat: i64,

    /// Expiry, seconds since epoch, when the issuer set one.
    #[serde(default)]
    pub exp: Option<i64>,

    /// The W3C verifiable credential claim set.
    #[serde(default)]
    pub vc: VcClaims,
}

/// The `vc` claim: context, types, subject claims, and services.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct VcClaims {
    /// JSON-LD contexts.
    #[serde(default, rename = "@context")]
    pub context: Vec<String>,

    /// Credential types, e.g. ["VerifiableCredential", "ProofOfEmployment"].
    #[serde(default, rename = "type")]
    pub credential_type: Vec<String>,

    /// Claims about the subject, schema-defined by the issuer.
    #[serde(default, rename = "credentialSubject")]
    pub credential_subject: Value,

    /// Issuer endpoint that re-issues this credential to a new subject.
    #[serde(default, rename = "exchangeService")]
    pub exchange_service: Option<ServiceDescriptor>,
}

/// A service endpoint advertised inside a credential.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ServiceDescriptor {
    /// Endpoint URL.
    pub id: String,
}

/// A received verifiable credential: raw token plus parsed contents.
///
/// Immutable once created. `pic_id` correlates all credentials descended
/// from one issuance: the original carries its own `jti` there, a pairwise
/// exchange of it carries the original's id.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VerifiableCredential {
    /// Credential id, the token's `jti`.
    pub jti: String,

    /// The raw signed token as received.
    pub raw: String,

    /// Parsed claim contents.
    pub contents: VerifiableCredentialContent,

    /// Correlation id linking exchanged copies to the original credential.
    pub pic_id: String,
}

impl VerifiableCredential {
    /// Unwraps a raw signed credential token into a credential.
    ///
    /// # Arguments
    /// * `raw` - Compact signed token as received from an issuer
    /// * `pic_id` - Correlation id; defaults to the token's own `jti`
    ///
    /// # Errors
    /// `SdkError::Encoding` if the token or its payload is malformed.
    pub fn from_raw(raw: &str, pic_id: Option<String>) -> SdkResult<Self> {
        let token = JwsToken::decode(raw)?;
        let contents: VerifiableCredentialContent = token.content()?;
        Ok(VerifiableCredential {
            jti: contents.jti.clone(),
            raw: raw.to_string(),
            pic_id: pic_id.unwrap_or_else(|| contents.jti.clone()),
            contents,
        })
    }
}

/// Holder-side wrapper persisted to storage.
///
/// Pairs a credential with the identifier that owns it and the display
/// contract used to render it. Created on successful issuance or exchange;
/// deleted only on explicit holder action.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VerifiableCredentialHolder {
    /// Stable card id; survives pairwise exchange of the inner credential.
    pub card_id: String,

    /// The wrapped credential.
    pub verifiable_credential: VerifiableCredential,

    /// Identifier that owns the credential.
    pub owner: Identifier,

    /// Display contract the wallet renders the credential with.
    pub display_contract: DisplayContract,
}

impl VerifiableCredentialHolder {
    /// Replaces the inner credential, keeping card id, owner, and display.
    ///
    /// Used after a pairwise exchange re-issues the credential to a new
    /// subject.
    pub fn with_credential(&self, verifiable_credential: VerifiableCredential) -> Self {
        VerifiableCredentialHolder {
            card_id: self.card_id.clone(),
            verifiable_credential,
            owner: self.owner.clone(),
            display_contract: self.display_contract.clone(),
        }
    }
}

/// One pairwise exchange in flight: re-issue `verifiable_credential` to
/// `pairwise_did`. Ephemeral; exists only for the duration of one exchange
/// call.
#[derive(Debug, Clone)]
pub struct ExchangeRequest {
    /// The credential being exchanged.
    pub verifiable_credential: VerifiableCredential,

    /// Pairwise DID the new credential will be bound to.
    pub pairwise_did: String,

    /// Identifier that owns the source credential and signs the exchange.
    pub owner: Identifier,

    /// Exchange endpoint of the issuer, from the credential's service entry.
    pub audience: String,
}

impl ExchangeRequest {
    /// Builds an exchange request for a credential and target pairwise DID.
    ///
    /// The audience comes from the credential's advertised exchange
    /// service; a credential without one yields an empty audience, which
    /// the engine rejects before any network call.
    pub fn new(
        verifiable_credential: VerifiableCredential,
        pairwise_did: String,
        owner: Identifier,
    ) -> Self {
        let audience = verifiable_credential
            .contents
            .vc
            .exchange_service
            .as_ref()
            .map(|service| service.id.clone())
            .unwrap_or_default();
        ExchangeRequest { verifiable_credential, pairwise_did, owner, audience }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::key_store::InMemoryKeyStore;
    use crate::token::jws::JwsHeader;

    fn raw_credential(jti: &str, sub: &str, exchange_service: Option<&str>) -> String {
        let store = InMemoryKeyStore::new();
        store.generate_signing_key("issuer_key", "sig_i").unwrap();
        let contents = VerifiableCredentialContent {
            jti: jti.to_string(),
            iss: "did:ion:issuer".to_string(),
            sub: sub.to_string(),
            iat: 1_700_000_000,
            exp: None,
            vc: VcClaims {
                context: vec!["https://www.w3.org/2018/credentials/v1".to_string()],
                credential_type: vec!["VerifiableCredential".to_string()],
                credential_subject: serde_json::json!({"id": sub}),
                exchange_service: exchange_service
                    .map(|url| ServiceDescriptor { id: url.to_string() }),
            },
        };
        let header = JwsHeader {
            alg: "ES256K".to_string(),
            kid: Some("did:ion:issuer#sig_i".to_string()),
            typ: Some("JWT".to_string()),
        };
        JwsToken::sign(header, &contents, "issuer_key", &store).unwrap().encode()
    }

    #[test]
    fn test_from_raw_parses_contents_and_defaults_pic_id() {
        let raw = raw_credential("vc-1", "did:ion:holder", None);
        let credential = VerifiableCredential::from_raw(&raw, None).unwrap();
        assert_eq!(credential.jti, "vc-1");
        assert_eq!(credential.pic_id, "vc-1");
        assert_eq!(credential.contents.sub, "did:ion:holder");
        assert_eq!(credential.raw, raw);
    }

    #[test]
    fn test_from_raw_keeps_explicit_correlation_id() {
        let raw = raw_credential("vc-2", "did:ion:pairwise", None);
        let credential = VerifiableCredential::from_raw(&raw, Some("vc-1".to_string())).unwrap();
        assert_eq!(credential.jti, "vc-2");
        assert_eq!(credential.pic_id, "vc-1");
    }

    #[test]
    fn test_from_raw_rejects_malformed_token() {
        assert!(VerifiableCredential::from_raw("not-a-token", None).is_err());
    }

    #[test]
    fn test_exchange_request_audience_from_service_entry() {
        let raw = raw_credential("vc-3", "did:ion:holder", Some("https://issuer.example/exchange"));
        let credential = VerifiableCredential::from_raw(&raw, None).unwrap();
        let owner = Identifier {
            id: "did:ion:holder".to_string(),
            name: "primary".to_string(),
            signature_key_ref: "sig".to_string(),
            encryption_key_ref: "enc".to_string(),
            recovery_key_ref: "rec".to_string(),
        };
        let request =
            ExchangeRequest::new(credential, "did:ion:pairwise".to_string(), owner.clone());
        assert_eq!(request.audience, "https://issuer.example/exchange");

        let raw = raw_credential("vc-4", "did:ion:holder", None);
        let credential = VerifiableCredential::from_raw(&raw, None).unwrap();
        let request = ExchangeRequest::new(credential, "did:ion:pairwise".to_string(), owner);
        assert!(request.audience.is_empty());
    }
}
