// src/validators/jws_validator.rs
//! Token signature validation against resolved DID documents.
//!
//! The `kid` header names the signing key as `did#fragment`; the DID half is
//! resolved to a document and the signature is checked against the
//! document's keys. Resolution failures are retryable-by-caller conditions
//! and propagate as resolver errors, never as a silent `false`.

use crate::error::{SdkError, SdkResult};
use crate::resolver::Resolver;
use crate::token::jws::JwsToken;
use k256::ecdsa::signature::Verifier;
use k256::ecdsa::Signature;
use std::sync::Arc;

/// Verifies token signatures by resolving the signer's DID.
pub struct JwsValidator {
    resolver: Arc<dyn Resolver>,
}

impl JwsValidator {
    /// Creates a validator over the given resolver.
    pub fn new(resolver: Arc<dyn Resolver>) -> Self {
        JwsValidator { resolver }
    }

    /// Verifies the signature on a token.
    ///
    /// Verification is attempted against every public key in the resolved
    /// document, not only the one matching the `kid` fragment; any matching
    /// key validates the token. This accommodates key-rotation documents
    /// that list several candidate keys, at the cost of accepting keys the
    /// `kid` did not name — callers relying on key identity must check the
    /// fragment themselves.
    ///
    /// # Returns
    /// - `Ok(true)` if at least one resolved key verifies the signature
    ///   over the header and payload bytes
    /// - `Ok(false)` if no key verifies
    ///
    /// # Errors
    /// - `SdkError::Validator` if the token has no `kid` or the `kid` is
    ///   not a `did#fragment` reference
    /// - `SdkError::Resolver` (propagated) if the DID cannot be resolved
    /// - `SdkError::KeyFormat` if a document key cannot be converted
    pub async fn verify_signature(&self, token: &JwsToken) -> SdkResult<bool> {
        let kid = token
            .kid()
            .ok_or_else(|| SdkError::Validator("no kid specified in token".to_string()))?;
        let (did, _fragment) = split_kid(kid)?;
        let document = self.resolver.resolve(did).await?;

        let public_keys = document
            .public_keys
            .iter()
            .map(|key| key.to_verifying_key())
            .collect::<SdkResult<Vec<_>>>()?;

        let signature = match Signature::from_slice(token.signature()) {
            Ok(signature) => signature,
            Err(_) => return Ok(false),
        };
        // Accept high-S encodings from signers that do not normalize.
        let signature = signature.normalize_s().unwrap_or(signature);
        let signing_input = token.signing_input();
        Ok(public_keys.iter().any(|key| key.verify(&signing_input, &signature).is_ok()))
    }
}

/// Splits a `did#fragment` key identifier into its halves.
///
/// # Errors
/// `SdkError::Validator` if the reference has no `#` separator.
pub fn split_kid(kid: &str) -> SdkResult<(&str, &str)> {
    let mut parts = kid.splitn(2, '#');
    let did = parts.next().unwrap_or_default();
    match parts.next() {
        Some(fragment) if !did.is_empty() => Ok((did, fragment)),
        _ => Err(SdkError::Validator(format!("malformed key reference '{}'", kid))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::key_store::InMemoryKeyStore;
    use crate::crypto::keys::{jwk_from_signing_key, JsonWebKey};
    use crate::models::did_document::{DidDocument, DidDocumentPublicKey};
    use crate::token::jws::JwsHeader;
    use async_trait::async_trait;
    use k256::ecdsa::SigningKey;
    use serde_json::json;

    struct FakeResolver {
        document: DidDocument,
    }

    #[async_trait]
    impl Resolver for FakeResolver {
        async fn resolve(&self, _did: &str) -> SdkResult<DidDocument> {
            Ok(self.document.clone())
        }
    }

    struct FailingResolver;

    #[async_trait]
    impl Resolver for FailingResolver {
        async fn resolve(&self, did: &str) -> SdkResult<DidDocument> {
            Err(SdkError::Resolver(format!("'{}' not found", did)))
        }
    }

    fn key_entry(fragment: &str, jwk: JsonWebKey) -> DidDocumentPublicKey {
        DidDocumentPublicKey {
            id: fragment.to_string(),
            key_type: "EcdsaSecp256k1VerificationKey2019".to_string(),
            controller: None,
            public_key_jwk: jwk,
        }
    }

    fn token_signed_by(store: &InMemoryKeyStore, key_ref: &str, kid: &str) -> JwsToken {
        let header = JwsHeader {
            alg: "ES256K".to_string(),
            kid: Some(kid.to_string()),
            typ: Some("JWT".to_string()),
        };
        JwsToken::sign(header, &json!({"iss": "did:ion:abc"}), key_ref, store).unwrap()
    }

    fn validator_with_keys(keys: Vec<DidDocumentPublicKey>) -> JwsValidator {
        let document =
            DidDocument { id: "did:ion:abc".to_string(), public_keys: keys, services: vec![] };
        JwsValidator::new(Arc::new(FakeResolver { document }))
    }

    #[tokio::test]
    async fn test_valid_signature_verifies_against_document_key() {
        let store = InMemoryKeyStore::new();
        let public = store.generate_signing_key("sign_primary", "sig_1").unwrap();
        let token = token_signed_by(&store, "sign_primary", "did:ion:abc#sig_1");

        let validator = validator_with_keys(vec![key_entry("sig_1", public)]);
        assert!(validator.verify_signature(&token).await.unwrap());
    }

    #[tokio::test]
    async fn test_any_resolved_key_may_verify() {
        // Key rotation: the kid names sig_1 but the document lists the
        // actual signer under sig_2. The permissive policy accepts it.
        let store = InMemoryKeyStore::new();
        let signer_public = store.generate_signing_key("rotated", "sig_2").unwrap();
        let other = SigningKey::random(&mut rand::thread_rng());
        let other_public = jwk_from_signing_key(&other, Some("sig_1".to_string()))
            .unwrap()
            .to_public();
        let token = token_signed_by(&store, "rotated", "did:ion:abc#sig_1");

        let validator = validator_with_keys(vec![
            key_entry("sig_1", other_public),
            key_entry("sig_2", signer_public),
        ]);
        assert!(validator.verify_signature(&token).await.unwrap());
    }

    #[tokio::test]
    async fn test_tampered_payload_fails_verification() {
        let store = InMemoryKeyStore::new();
        let public = store.generate_signing_key("sign_primary", "sig_1").unwrap();
        let token = token_signed_by(&store, "sign_primary", "did:ion:abc#sig_1");

        // Re-assemble the compact form with a mutated payload segment.
        let raw = token.encode();
        let mut segments: Vec<String> = raw.split('.').map(str::to_string).collect();
        segments[1] = crate::utils::serialization::encode_base64url(b"{\"iss\":\"did:ion:evil\"}");
        let tampered = JwsToken::decode(&segments.join(".")).unwrap();

        let validator = validator_with_keys(vec![key_entry("sig_1", public)]);
        assert!(!validator.verify_signature(&tampered).await.unwrap());
    }

    #[tokio::test]
    async fn test_missing_kid_is_a_validation_error() {
        let store = InMemoryKeyStore::new();
        let public = store.generate_signing_key("sign_primary", "sig_1").unwrap();
        let header = JwsHeader { alg: "ES256K".to_string(), kid: None, typ: None };
        let token = JwsToken::sign(header, &json!({}), "sign_primary", &store).unwrap();

        let validator = validator_with_keys(vec![key_entry("sig_1", public)]);
        let err = validator.verify_signature(&token).await.unwrap_err();
        assert!(matches!(err, SdkError::Validator(_)));
    }

    #[tokio::test]
    async fn test_malformed_kid_is_a_validation_error() {
        let store = InMemoryKeyStore::new();
        store.generate_signing_key("sign_primary", "sig_1").unwrap();
        let token = token_signed_by(&store, "sign_primary", "no-fragment-here");

        let validator = validator_with_keys(vec![]);
        let err = validator.verify_signature(&token).await.unwrap_err();
        assert!(matches!(err, SdkError::Validator(_)));
    }

    #[tokio::test]
    async fn test_resolution_failure_propagates() {
        let store = InMemoryKeyStore::new();
        store.generate_signing_key("sign_primary", "sig_1").unwrap();
        let token = token_signed_by(&store, "sign_primary", "did:ion:abc#sig_1");

        let validator = JwsValidator::new(Arc::new(FailingResolver));
        let err = validator.verify_signature(&token).await.unwrap_err();
        assert!(matches!(err, SdkError::Resolver(_)));
    }

    #[test]
    fn test_split_kid() {
        assert_eq!(split_kid("did:ion:abc#sig_1").unwrap(), ("did:ion:abc", "sig_1"));
        assert!(split_kid("did:ion:abc").is_err());
        assert!(split_kid("#sig_1").is_err());
    }
}
