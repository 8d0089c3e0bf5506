// src/crypto/key_store.rs
//! Key store capability for the credential exchange SDK.
//!
//! The SDK never touches raw private keys outside this boundary: signing is
//! delegated to a [`KeyStore`] through an opaque key reference, so a platform
//! adapter (secure enclave, keychain) can implement the same trait. The
//! in-memory implementation backs tests and soft-key deployments.

use crate::crypto::keys::{
    jwk_from_signing_key, signing_key_from_jwk, verifying_key_from_jwk, JsonWebKey,
};
use crate::error::{SdkError, SdkResult};
use k256::ecdsa::signature::{Signer, Verifier};
use k256::ecdsa::{Signature, SigningKey};
use std::collections::HashMap;
use std::sync::Mutex;

/// Material stored under a key reference.
///
/// Signing and encryption keys are JWKs; secret keys are opaque byte strings
/// (seeds, symmetric keys).
#[derive(Debug, Clone)]
pub enum KeyEntry {
    /// An EC key pair or public key in JWK form.
    Jwk(JsonWebKey),
    /// Opaque secret bytes.
    Secret(Vec<u8>),
}

/// Capability interface over platform key storage.
///
/// Key references are caller-chosen names (`"sign_primary"`); the key id is
/// the `kid` fragment carried in the stored JWK, used to form the `did#kid`
/// header of signed tokens.
pub trait KeyStore: Send + Sync {
    /// Signs `data` with the private key stored under `key_ref`.
    ///
    /// # Returns
    /// 64-byte compact ECDSA signature (R || S) over SHA-256 of `data`.
    fn sign(&self, key_ref: &str, data: &[u8]) -> SdkResult<Vec<u8>>;

    /// Returns the public half of the key stored under `key_ref`.
    fn get_public_key(&self, key_ref: &str) -> SdkResult<JsonWebKey>;

    /// Returns the private JWK stored under `key_ref`.
    fn get_private_key(&self, key_ref: &str) -> SdkResult<JsonWebKey>;

    /// Returns the opaque secret stored under `key_ref`.
    fn get_secret_key(&self, key_ref: &str) -> SdkResult<Vec<u8>>;

    /// Saves key material under `key_ref`, overwriting any previous entry.
    fn save(&self, key_ref: &str, entry: KeyEntry) -> SdkResult<()>;

    /// Lists stored keys as a map of key reference to key id.
    ///
    /// Secret entries have no key id and map to an empty string.
    fn list(&self) -> SdkResult<HashMap<String, String>>;
}

/// In-memory [`KeyStore`] holding soft keys behind a mutex.
///
/// Keys never leave the process; lock poisoning is surfaced as a
/// `KeyStore` error rather than a panic.
pub struct InMemoryKeyStore {
    entries: Mutex<HashMap<String, KeyEntry>>,
}

impl InMemoryKeyStore {
    /// Creates an empty key store.
    pub fn new() -> Self {
        InMemoryKeyStore { entries: Mutex::new(HashMap::new()) }
    }

    /// Generates a fresh secp256k1 signing key under `key_ref`.
    ///
    /// # Arguments
    /// * `key_ref` - Key store reference to save the key under
    /// * `kid` - Key id fragment recorded in the JWK
    ///
    /// # Returns
    /// The public JWK of the generated key.
    pub fn generate_signing_key(&self, key_ref: &str, kid: &str) -> SdkResult<JsonWebKey> {
        let signing_key = SigningKey::random(&mut rand::thread_rng());
        let jwk = jwk_from_signing_key(&signing_key, Some(kid.to_string()))?;
        self.save(key_ref, KeyEntry::Jwk(jwk.clone()))?;
        Ok(jwk.to_public())
    }

    /// Verifies a compact signature against the public key under `key_ref`.
    pub fn verify(&self, key_ref: &str, data: &[u8], signature: &[u8]) -> SdkResult<bool> {
        let jwk = self.get_public_key(key_ref)?;
        let verifying_key = verifying_key_from_jwk(&jwk)?;
        let signature = Signature::from_slice(signature)
            .map_err(|e| SdkError::Signature(format!("malformed signature: {}", e)))?;
        Ok(verifying_key.verify(data, &signature).is_ok())
    }

    fn get_entry(&self, key_ref: &str) -> SdkResult<KeyEntry> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| SdkError::KeyStore("key store lock poisoned".to_string()))?;
        entries
            .get(key_ref)
            .cloned()
            .ok_or_else(|| SdkError::KeyStore(format!("no key stored under '{}'", key_ref)))
    }
}

impl Default for InMemoryKeyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyStore for InMemoryKeyStore {
    fn sign(&self, key_ref: &str, data: &[u8]) -> SdkResult<Vec<u8>> {
        let jwk = self.get_private_key(key_ref)?;
        let signing_key = signing_key_from_jwk(&jwk)?;
        let signature: Signature = signing_key.sign(data);
        Ok(signature.to_vec())
    }

    fn get_public_key(&self, key_ref: &str) -> SdkResult<JsonWebKey> {
        match self.get_entry(key_ref)? {
            KeyEntry::Jwk(jwk) => Ok(jwk.to_public()),
            KeyEntry::Secret(_) => {
                Err(SdkError::Key(format!("'{}' is a secret key, not a key pair", key_ref)))
            }
        }
    }

    fn get_private_key(&self, key_ref: &str) -> SdkResult<JsonWebKey> {
        match self.get_entry(key_ref)? {
            KeyEntry::Jwk(jwk) if jwk.is_private() => Ok(jwk),
            KeyEntry::Jwk(_) => {
                Err(SdkError::Key(format!("'{}' holds no private material", key_ref)))
            }
            KeyEntry::Secret(_) => {
                Err(SdkError::Key(format!("'{}' is a secret key, not a key pair", key_ref)))
            }
        }
    }

    fn get_secret_key(&self, key_ref: &str) -> SdkResult<Vec<u8>> {
        match self.get_entry(key_ref)? {
            KeyEntry::Secret(bytes) => Ok(bytes),
            KeyEntry::Jwk(_) => {
                Err(SdkError::Key(format!("'{}' is a key pair, not a secret key", key_ref)))
            }
        }
    }

    fn save(&self, key_ref: &str, entry: KeyEntry) -> SdkResult<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| SdkError::KeyStore("key store lock poisoned".to_string()))?;
        entries.insert(key_ref.to_string(), entry);
        Ok(())
    }

    fn list(&self) -> SdkResult<HashMap<String, String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| SdkError::KeyStore("key store lock poisoned".to_string()))?;
        Ok(entries
            .iter()
            .map(|(key_ref, entry)| {
                let kid = match entry {
                    KeyEntry::Jwk(jwk) => jwk.kid.clone().unwrap_or_default(),
                    KeyEntry::Secret(_) => String::new(),
                };
                (key_ref.clone(), kid)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_and_verify_round_trip() {
        let store = InMemoryKeyStore::new();
        store.generate_signing_key("sign_primary", "sig_1").unwrap();

        let signature = store.sign("sign_primary", b"header.payload").unwrap();
        assert_eq!(signature.len(), 64);
        assert!(store.verify("sign_primary", b"header.payload", &signature).unwrap());
        assert!(!store.verify("sign_primary", b"header.tampered", &signature).unwrap());
    }

    #[test]
    fn test_missing_key_fails_with_key_store_error() {
        let store = InMemoryKeyStore::new();
        assert!(matches!(store.sign("absent", b"data"), Err(SdkError::KeyStore(_))));
    }

    #[test]
    fn test_secret_keys_are_distinct_from_key_pairs() {
        let store = InMemoryKeyStore::new();
        store.save("seed", KeyEntry::Secret(vec![7u8; 32])).unwrap();

        assert_eq!(store.get_secret_key("seed").unwrap(), vec![7u8; 32]);
        assert!(matches!(store.get_public_key("seed"), Err(SdkError::Key(_))));
        assert!(matches!(store.sign("seed", b"data"), Err(SdkError::Key(_))));
    }

    #[test]
    fn test_list_maps_key_refs_to_kids() {
        let store = InMemoryKeyStore::new();
        store.generate_signing_key("sign_primary", "sig_1").unwrap();
        store.save("seed", KeyEntry::Secret(vec![1, 2, 3])).unwrap();

        let listing = store.list().unwrap();
        assert_eq!(listing.get("sign_primary").map(String::as_str), Some("sig_1"));
        assert_eq!(listing.get("seed").map(String::as_str), Some(""));
    }

    #[test]
    fn test_public_key_never_exposes_private_scalar() {
        let store = InMemoryKeyStore::new();
        store.generate_signing_key("sign_primary", "sig_1").unwrap();
        assert!(store.get_public_key("sign_primary").unwrap().d.is_none());
        assert!(store.get_private_key("sign_primary").unwrap().d.is_some());
    }
}
