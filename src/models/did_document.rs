// src/models/did_document.rs
//! DID document data model.
//!
//! The shape produced by DID resolution, following the
//! [DID Core Specification](https://www.w3.org/TR/did-core/): a document id
//! plus the public keys registered for the identifier, each carrying its key
//! material as a JWK. Read-only to consumers.

use crate::crypto::keys::{verifying_key_from_jwk, JsonWebKey};
use crate::error::SdkResult;
use k256::ecdsa::VerifyingKey;
use serde::{Deserialize, Serialize};

/// A resolved DID document.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct DidDocument {
    /// The DID this document describes.
    pub id: String,

    /// Public keys registered for the DID, indexed by key id fragment.
    #[serde(default, rename = "publicKeys")]
    pub public_keys: Vec<DidDocumentPublicKey>,

    /// Service endpoints advertised by the DID subject.
    #[serde(default, rename = "services")]
    pub services: Vec<DidDocumentService>,
}

impl DidDocument {
    /// Looks up a public key by its id fragment (the part after `#`).
    pub fn public_key_by_fragment(&self, fragment: &str) -> Option<&DidDocumentPublicKey> {
        self.public_keys.iter().find(|key| key.id == fragment)
    }
}

/// A public key entry in a DID document, in JWK format.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DidDocumentPublicKey {
    /// Key id fragment, e.g. "sig_3737f226".
    pub id: String,

    /// Key type, e.g. "EcdsaSecp256k1VerificationKey2019".
    #[serde(rename = "type")]
    pub key_type: String,

    /// DID controlling the key, when different from the document subject.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub controller: Option<String>,

    /// The public key material.
    #[serde(rename = "jwk")]
    pub public_key_jwk: JsonWebKey,
}

impl DidDocumentPublicKey {
    /// Converts the entry into a verification-capable key.
    ///
    /// # Errors
    /// `SdkError::KeyFormat` if the JWK cannot be converted.
    pub fn to_verifying_key(&self) -> SdkResult<VerifyingKey> {
        verifying_key_from_jwk(&self.public_key_jwk)
    }
}

/// A service endpoint entry in a DID document.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DidDocumentService {
    /// Service id fragment.
    pub id: String,

    /// Service type, e.g. "IdentityHub".
    #[serde(rename = "type")]
    pub service_type: String,

    /// Endpoint URI.
    #[serde(rename = "serviceEndpoint")]
    pub service_endpoint: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::jwk_from_signing_key;
    use k256::ecdsa::SigningKey;

    fn document_with_key(fragment: &str) -> DidDocument {
        let key = SigningKey::random(&mut rand::thread_rng());
        let jwk = jwk_from_signing_key(&key, Some(fragment.to_string())).unwrap().to_public();
        DidDocument {
            id: "did:ion:abc".to_string(),
            public_keys: vec![DidDocumentPublicKey {
                id: fragment.to_string(),
                key_type: "EcdsaSecp256k1VerificationKey2019".to_string(),
                controller: None,
                public_key_jwk: jwk,
            }],
            services: vec![],
        }
    }

    #[test]
    fn test_public_key_lookup_by_fragment() {
        let document = document_with_key("sig_1");
        assert!(document.public_key_by_fragment("sig_1").is_some());
        assert!(document.public_key_by_fragment("sig_2").is_none());
    }

    #[test]
    fn test_document_key_converts_to_verifying_key() {
        let document = document_with_key("sig_1");
        assert!(document.public_keys[0].to_verifying_key().is_ok());
    }
}
