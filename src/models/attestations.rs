// src/models/attestations.rs
//! Claim attestation shapes carried by issuance and presentation requests.
//!
//! An attestation names something the relying party wants from the holder:
//! a self-attested claim, an id token from a named OIDC configuration, or a
//! presentation of an already-held verifiable credential. Responses are
//! built by binding concrete values to these attestations.

use serde::{Deserialize, Serialize};

/// The set of attestations requested by a relying party or issuer.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialAttestations {
    /// Claims the holder attests to directly.
    #[serde(default, rename = "selfIssued")]
    pub self_issued: Vec<ClaimAttestation>,

    /// Id tokens requested from external OIDC providers.
    #[serde(default, rename = "idTokens")]
    pub id_tokens: Vec<IdTokenAttestation>,

    /// Verifiable credentials requested for presentation.
    #[serde(default)]
    pub presentations: Vec<PresentationAttestation>,
}

impl CredentialAttestations {
    /// Whether any attestation is requested at all.
    pub fn is_empty(&self) -> bool {
        self.self_issued.is_empty() && self.id_tokens.is_empty() && self.presentations.is_empty()
    }
}

/// A single claim the holder is asked to attest to.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClaimAttestation {
    /// Claim name, e.g. "email".
    pub claim: String,

    /// Whether the response is rejected without this claim.
    #[serde(default)]
    pub required: bool,
}

/// A request for an id token from a named OIDC configuration.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdTokenAttestation {
    /// OIDC configuration URL identifying the provider.
    pub configuration: String,

    /// Client id registered with the provider.
    #[serde(default, rename = "client_id")]
    pub client_id: String,

    /// Redirect URI registered with the provider.
    #[serde(default, rename = "redirect_uri")]
    pub redirect_uri: String,

    /// Claims expected inside the id token.
    #[serde(default)]
    pub claims: Vec<ClaimAttestation>,
}

/// A request for presentation of a held verifiable credential.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct PresentationAttestation {
    /// Credential type being requested, e.g. "ProofOfEmployment".
    #[serde(rename = "credentialType")]
    pub credential_type: String,

    /// Claims expected from the credential.
    #[serde(default)]
    pub claims: Vec<ClaimAttestation>,

    /// Whether the presentation is mandatory.
    #[serde(default)]
    pub required: bool,
}
