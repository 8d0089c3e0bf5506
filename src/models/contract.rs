// src/models/contract.rs
//! Verifiable credential contract model.
//!
//! A contract is fetched from an issuer and describes a credential offering:
//! how to display the credential and what the issuer requires before issuing
//! it. Issuance requests are built from a contract plus the URL it was
//! fetched from.

use crate::models::attestations::CredentialAttestations;
use serde::{Deserialize, Serialize};

/// A credential offering published by an issuer.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifiableCredentialContract {
    /// Contract identifier.
    #[serde(default)]
    pub id: String,

    /// How the issued credential should be rendered by a wallet.
    pub display: DisplayContract,

    /// What the issuer requires to issue the credential.
    pub input: InputContract,
}

/// Display half of a contract.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayContract {
    /// Locale the display strings are written in.
    #[serde(default)]
    pub locale: String,

    /// Card rendering details.
    pub card: CardDisplay,
}

/// Card face shown for a credential.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct CardDisplay {
    /// Card title, e.g. "Employee Badge".
    #[serde(default)]
    pub title: String,

    /// Issuing entity's display name.
    #[serde(default, rename = "issuedBy")]
    pub issued_by: String,

    /// Longer description of the credential.
    #[serde(default)]
    pub description: String,
}

/// Input half of a contract.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct InputContract {
    /// Endpoint issuance responses are sent to; the response audience.
    #[serde(default, rename = "credentialIssuer")]
    pub credential_issuer: String,

    /// DID of the issuing entity.
    #[serde(default)]
    pub issuer: String,

    /// Attestations the issuer requires.
    #[serde(default)]
    pub attestations: CredentialAttestations,
}
