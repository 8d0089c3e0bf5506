// src/validators/domain_linkage.rs
//! DID configuration (domain linkage) validation.
//!
//! A relying party proves control of a web origin by publishing a DID
//! configuration document at a well-known location. The document carries
//! `linked_dids`: signed tokens asserting "this DID belongs to this origin".
//! Validation fails closed: a token that does not verify, or whose DID or
//! origin does not match expectations, yields `false`. Only structurally
//! invalid input is an error.

use crate::error::SdkResult;
use crate::token::jws::JwsToken;
use crate::utils::constants::DOMAIN_LINKAGE_CREDENTIAL_TYPE;
use crate::validators::jws_validator::JwsValidator;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A DID configuration document fetched from
/// `https://{domain}/.well-known/did-configuration.json`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DidConfigResource {
    /// JSON-LD context of the document.
    #[serde(rename = "@context")]
    pub context: String,

    /// Domain-linkage assertion tokens, one per linked DID.
    pub linked_dids: Vec<String>,
}

impl DidConfigResource {
    /// Parses a fetched `did-configuration.json` body.
    pub fn from_json(body: &str) -> SdkResult<Self> {
        crate::utils::serialization::deserialize(body)
    }

    /// Serializes the document back to its wire form.
    pub fn to_json(&self) -> SdkResult<String> {
        crate::utils::serialization::serialize(self)
    }
}

/// Payload of a domain-linkage assertion token.
#[derive(Deserialize, Debug)]
struct DomainLinkageClaims {
    #[serde(default)]
    sub: String,
    #[serde(default)]
    iss: String,
    #[serde(default)]
    vc: DomainLinkageVc,
}

#[derive(Deserialize, Debug, Default)]
struct DomainLinkageVc {
    #[serde(default, rename = "type")]
    credential_type: Vec<String>,
    #[serde(default, rename = "credentialSubject")]
    credential_subject: DomainLinkageSubject,
}

#[derive(Deserialize, Debug, Default)]
struct DomainLinkageSubject {
    #[serde(default)]
    id: String,
    #[serde(default)]
    origin: String,
}

/// Validates domain-linkage assertions against an expected DID and origin.
pub struct DomainLinkageValidator {
    jws_validator: Arc<JwsValidator>,
}

impl DomainLinkageValidator {
    /// Creates a validator using the given signature validator.
    pub fn new(jws_validator: Arc<JwsValidator>) -> Self {
        DomainLinkageValidator { jws_validator }
    }

    /// Validates one domain-linkage assertion token.
    ///
    /// # Arguments
    /// * `token` - Compact signed assertion from `linked_dids`
    /// * `expected_did` - DID the relying party claims as its own
    /// * `expected_domain` - Origin the document was fetched from
    ///
    /// # Returns
    /// `Ok(true)` iff the signature verifies and the token binds exactly
    /// `expected_did` to `expected_domain`. Mismatches yield `Ok(false)`;
    /// only malformed input is an error.
    pub async fn validate(
        &self,
        token: &str,
        expected_did: &str,
        expected_domain: &str,
    ) -> SdkResult<bool> {
        let jws = JwsToken::decode(token)?;
        if !self.jws_validator.verify_signature(&jws).await? {
            log::debug!("domain linkage token signature did not verify");
            return Ok(false);
        }
        let claims: DomainLinkageClaims = jws.content()?;
        let linked = claims.sub == expected_did
            && claims.iss == expected_did
            && claims.vc.credential_subject.id == expected_did
            && claims.vc.credential_subject.origin == expected_domain
            && claims
                .vc
                .credential_type
                .iter()
                .any(|t| t == DOMAIN_LINKAGE_CREDENTIAL_TYPE);
        Ok(linked)
    }

    /// Validates a whole DID configuration document.
    ///
    /// # Returns
    /// `Ok(true)` if any linked token binds `expected_did` to
    /// `expected_domain`.
    pub async fn validate_config_document(
        &self,
        resource: &DidConfigResource,
        expected_did: &str,
        expected_domain: &str,
    ) -> SdkResult<bool> {
        for token in &resource.linked_dids {
            if self.validate(token, expected_did, expected_domain).await? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::key_store::InMemoryKeyStore;
    use crate::error::SdkError;
    use crate::models::did_document::{DidDocument, DidDocumentPublicKey};
    use crate::resolver::Resolver;
    use crate::token::jws::JwsHeader;
    use async_trait::async_trait;
    use serde_json::json;

    const RP_DID: &str = "did:ion:EiB7J-k0f3ImG-zyFUFRmV4gaOsdfjy3kddJ_d9OOv7shA";
    const KEY_FRAGMENT: &str = "sig_3737f226";

    struct FakeResolver {
        document: DidDocument,
    }

    #[async_trait]
    impl Resolver for FakeResolver {
        async fn resolve(&self, _did: &str) -> SdkResult<DidDocument> {
            Ok(self.document.clone())
        }
    }

    /// Builds a signed config document plus a validator whose resolver
    /// serves the signing key under `sig_3737f226`.
    fn linked_config(origin: &str) -> (DidConfigResource, DomainLinkageValidator) {
        let store = InMemoryKeyStore::new();
        let public = store.generate_signing_key("rp_signing", KEY_FRAGMENT).unwrap();

        let claims = json!({
            "sub": RP_DID,
            "iss": RP_DID,
            "nbf": 1_602_705_016i64,
            "vc": {
                "@context": [
                    "https://www.w3.org/2018/credentials/v1",
                    "https://identity.foundation/.well-known/contexts/did-configuration-v0.0.jsonld"
                ],
                "issuer": RP_DID,
                "type": ["VerifiableCredential", "DomainLinkageCredential"],
                "credentialSubject": { "id": RP_DID, "origin": origin }
            }
        });
        let header = JwsHeader {
            alg: "ES256K".to_string(),
            kid: Some(format!("{}#{}", RP_DID, KEY_FRAGMENT)),
            typ: None,
        };
        let token = JwsToken::sign(header, &claims, "rp_signing", &store).unwrap().encode();

        let resource = DidConfigResource {
            context: "https://identity.foundation/.well-known/contexts/did-configuration-v0.0.jsonld"
                .to_string(),
            linked_dids: vec![token],
        };
        let document = DidDocument {
            id: RP_DID.to_string(),
            public_keys: vec![DidDocumentPublicKey {
                id: KEY_FRAGMENT.to_string(),
                key_type: "EcdsaSecp256k1VerificationKey2019".to_string(),
                controller: None,
                public_key_jwk: public,
            }],
            services: vec![],
        };
        let jws_validator = Arc::new(JwsValidator::new(Arc::new(FakeResolver { document })));
        (resource, DomainLinkageValidator::new(jws_validator))
    }

    #[tokio::test]
    async fn test_config_document_validates_for_linked_domain() {
        let (resource, validator) = linked_config("www.google.com");
        assert!(validator
            .validate(&resource.linked_dids[0], RP_DID, "www.google.com")
            .await
            .unwrap());
        assert!(validator
            .validate_config_document(&resource, RP_DID, "www.google.com")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_wrong_expected_domain_fails_closed() {
        let (resource, validator) = linked_config("www.google.com");
        assert!(!validator
            .validate(&resource.linked_dids[0], RP_DID, "evil.com")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_wrong_expected_did_fails_closed() {
        let (resource, validator) = linked_config("www.google.com");
        assert!(!validator
            .validate(&resource.linked_dids[0], "did:ion:someone-else", "www.google.com")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_structurally_invalid_token_is_an_error() {
        let (_, validator) = linked_config("www.google.com");
        let err = validator.validate("garbage", RP_DID, "www.google.com").await.unwrap_err();
        assert!(matches!(err, SdkError::Encoding(_)));
    }

    #[test]
    fn test_config_resource_parses_wire_shape() {
        let body = r#"{
            "@context": "https://identity.foundation/.well-known/contexts/did-configuration-v0.0.jsonld",
            "linked_dids": ["a.b.c"]
        }"#;
        let resource = DidConfigResource::from_json(body).unwrap();
        assert_eq!(resource.linked_dids.len(), 1);
        assert!(resource.to_json().unwrap().contains("linked_dids"));
    }
}
