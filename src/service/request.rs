// src/service/request.rs
//! Issuance and presentation requests.
//!
//! A request is immutable once constructed and is validated exactly once
//! before a response is built from it. The two request kinds are a closed
//! set, dispatched by pattern match.

use crate::models::contract::VerifiableCredentialContract;
use crate::models::oidc::{OidcRequestContent, PresentationDefinition};
use serde::{Deserialize, Serialize};

/// A request received from an issuer or relying party.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum Request {
    /// An issuer's offer to issue a credential, built from a contract.
    Issuance(IssuanceRequest),
    /// A relying party's request to present credentials.
    Presentation(PresentationRequest),
}

impl Request {
    /// Display name of the requesting entity.
    pub fn entity_name(&self) -> &str {
        match self {
            Request::Issuance(request) => request.entity_name(),
            Request::Presentation(request) => request.entity_name(),
        }
    }

    /// DID of the requesting entity.
    pub fn entity_identifier(&self) -> &str {
        match self {
            Request::Issuance(request) => request.entity_identifier(),
            Request::Presentation(request) => request.entity_identifier(),
        }
    }
}

/// An issuance request: a contract plus the URL it was fetched from.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct IssuanceRequest {
    /// The credential offering.
    pub contract: VerifiableCredentialContract,

    /// Where the contract was fetched from.
    pub contract_url: String,
}

impl IssuanceRequest {
    /// Builds an issuance request from a fetched contract.
    pub fn new(contract: VerifiableCredentialContract, contract_url: String) -> Self {
        IssuanceRequest { contract, contract_url }
    }

    /// Display name of the issuer.
    pub fn entity_name(&self) -> &str {
        &self.contract.display.card.issued_by
    }

    /// DID of the issuer.
    pub fn entity_identifier(&self) -> &str {
        &self.contract.input.issuer
    }

    /// Endpoint the issuance response is sent to.
    pub fn audience(&self) -> &str {
        &self.contract.input.credential_issuer
    }
}

/// A presentation request: the raw token plus its parsed content.
///
/// The raw token is kept because validation re-verifies its signature
/// against the requester's DID document.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PresentationRequest {
    /// The request token exactly as received.
    pub serialized_token: String,

    /// Parsed request payload.
    pub content: OidcRequestContent,
}

impl PresentationRequest {
    /// Builds a presentation request from a received token.
    pub fn new(serialized_token: String, content: OidcRequestContent) -> Self {
        PresentationRequest { serialized_token, content }
    }

    /// Display name of the relying party, when registered.
    pub fn entity_name(&self) -> &str {
        self.content
            .registration
            .as_ref()
            .map(|registration| registration.client_name.as_str())
            .unwrap_or("")
    }

    /// DID of the relying party.
    pub fn entity_identifier(&self) -> &str {
        &self.content.iss
    }

    /// Endpoint the presentation response is sent to.
    pub fn audience(&self) -> &str {
        &self.content.redirect_url
    }

    /// The credentials requested, when the request carries a definition.
    pub fn presentation_definition(&self) -> Option<&PresentationDefinition> {
        self.content.presentation_definition.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::contract::{CardDisplay, DisplayContract, InputContract};
    use crate::models::oidc::Registration;

    #[test]
    fn test_issuance_request_entity_comes_from_contract() {
        let contract = VerifiableCredentialContract {
            id: "contract-1".to_string(),
            display: DisplayContract {
                locale: "en".to_string(),
                card: CardDisplay {
                    title: "Badge".to_string(),
                    issued_by: "Example University".to_string(),
                    description: String::new(),
                },
            },
            input: InputContract {
                credential_issuer: "https://issuer.example/issue".to_string(),
                issuer: "did:ion:issuer".to_string(),
                attestations: Default::default(),
            },
        };
        let request =
            Request::Issuance(IssuanceRequest::new(contract, "https://issuer.example/c/1".into()));
        assert_eq!(request.entity_name(), "Example University");
        assert_eq!(request.entity_identifier(), "did:ion:issuer");
    }

    #[test]
    fn test_presentation_request_entity_comes_from_registration() {
        let content = OidcRequestContent {
            iss: "did:ion:rp".to_string(),
            redirect_url: "https://rp.example/present".to_string(),
            registration: Some(Registration {
                client_name: "Example RP".to_string(),
                ..Registration::default()
            }),
            ..OidcRequestContent::default()
        };
        let request = PresentationRequest::new("a.b.c".to_string(), content);
        assert_eq!(request.entity_name(), "Example RP");
        assert_eq!(request.entity_identifier(), "did:ion:rp");
        assert_eq!(request.audience(), "https://rp.example/present");
    }

    #[test]
    fn test_presentation_request_without_registration_has_empty_name() {
        let request =
            PresentationRequest::new("a.b.c".to_string(), OidcRequestContent::default());
        assert_eq!(request.entity_name(), "");
    }
}
