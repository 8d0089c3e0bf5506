// src/models/oidc.rs
//! Contents of an OpenID Self-Issued Token Request.
//!
//! The presentation request token's payload, as defined by the
//! [OpenID Connect core spec](https://openid.net/specs/openid-connect-core-1_0.html#JWTRequests)
//! plus the DID-authn extensions (attestations, presentation definition).
//! All fields default so that partially-populated requests still parse; the
//! validator decides which absences are fatal.

use crate::models::attestations::CredentialAttestations;
use serde::{Deserialize, Serialize};

/// Parsed payload of a presentation request token.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct OidcRequestContent {
    /// What the response object should be; the SDK only supports "id_token".
    #[serde(default, rename = "response_type")]
    pub response_type: String,

    /// How the response should be delivered; the SDK only supports
    /// "form_post".
    #[serde(default, rename = "response_mode")]
    pub response_mode: String,

    /// DID of the entity that sent the request.
    #[serde(default, rename = "client_id")]
    pub client_id: String,

    /// Where the response should be sent; the response audience.
    #[serde(default, rename = "redirect_uri")]
    pub redirect_url: String,

    /// DID of the requester.
    #[serde(default)]
    pub iss: String,

    /// Should contain "openid did_authn".
    #[serde(default)]
    pub scope: String,

    /// Opaque value echoed back to the requester.
    #[serde(default)]
    pub state: Option<String>,

    /// Replay-protection nonce echoed back to the requester.
    #[serde(default)]
    pub nonce: String,

    /// Attestations being requested.
    #[serde(default)]
    pub attestations: Option<CredentialAttestations>,

    /// Presentation-exchange definition of the credentials requested.
    #[serde(default, rename = "presentation_definition")]
    pub presentation_definition: Option<PresentationDefinition>,

    /// Expiry, seconds since epoch.
    #[serde(default)]
    pub exp: i64,

    /// Issued-at, seconds since epoch.
    #[serde(default)]
    pub iat: i64,

    /// Not-before, seconds since epoch.
    #[serde(default)]
    pub nbf: i64,

    /// Relying-party metadata shown to the user.
    #[serde(default)]
    pub registration: Option<Registration>,

    /// Intended audience of the request token.
    #[serde(default)]
    pub aud: String,
}

/// Relying-party registration metadata.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Registration {
    /// Display name of the relying party.
    #[serde(default, rename = "client_name")]
    pub client_name: String,

    /// Why the relying party is asking, shown to the user.
    #[serde(default, rename = "client_purpose")]
    pub client_purpose: String,

    /// Logo shown next to the consent prompt.
    #[serde(default, rename = "logo_uri")]
    pub logo_uri: String,
}

/// Presentation-exchange definition: which credentials are requested.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct PresentationDefinition {
    /// One descriptor per requested credential.
    #[serde(default, rename = "input_descriptors")]
    pub input_descriptors: Vec<InputDescriptor>,
}

/// A single requested credential within a presentation definition.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct InputDescriptor {
    /// Descriptor id, unique within the definition.
    pub id: String,

    /// Credential schema URIs that satisfy this descriptor.
    #[serde(default)]
    pub schema: Vec<String>,

    /// Why the credential is requested, shown to the user.
    #[serde(default)]
    pub purpose: String,
}
