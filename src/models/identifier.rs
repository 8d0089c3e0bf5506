// src/models/identifier.rs
//! Holder-side identifier model.

use serde::{Deserialize, Serialize};

/// A DID owned by the holder, together with references into the key store
/// for the keys the DID document was registered with.
///
/// Immutable once registered; the DID string resolves to a
/// [`DidDocument`](crate::models::did_document::DidDocument) whose public
/// keys correspond to the referenced private keys.
///
/// Pairwise identifiers use the same shape: a per-relationship DID with its
/// own key references, so presenting to one relying party never reveals the
/// DID used with another.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    /// The DID string, e.g. "did:ion:EiB7...".
    pub id: String,

    /// Human-readable label for the identifier.
    pub name: String,

    /// Key store reference of the signing key; also the `kid` fragment
    /// used in tokens signed by this identifier.
    pub signature_key_ref: String,

    /// Key store reference of the encryption key.
    pub encryption_key_ref: String,

    /// Key store reference of the recovery key.
    pub recovery_key_ref: String,
}

impl Identifier {
    /// Full key identifier of the signing key, `did#fragment`.
    pub fn signing_kid(&self) -> String {
        format!("{}#{}", self.id, self.signature_key_ref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signing_kid_joins_did_and_fragment() {
        let identifier = Identifier {
            id: "did:ion:abc".to_string(),
            name: "primary".to_string(),
            signature_key_ref: "sig_1".to_string(),
            encryption_key_ref: "enc_1".to_string(),
            recovery_key_ref: "rec_1".to_string(),
        };
        assert_eq!(identifier.signing_kid(), "did:ion:abc#sig_1");
    }
}
