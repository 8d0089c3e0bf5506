// src/formatters/exchange.rs
//! Pairwise exchange formatting.
//!
//! An exchange asks the original issuer to re-issue a credential to a new
//! pairwise DID. The formatted token embeds the source credential verbatim
//! so the issuer can verify its own signature over it, and names the
//! recipient DID the replacement must be bound to.

use crate::crypto::key_store::KeyStore;
use crate::error::{SdkError, SdkResult};
use crate::formatters::{issued_and_expiry, sign_claims};
use crate::models::credential::ExchangeRequest;
use crate::utils::constants::SELF_ISSUED;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Payload of a formatted exchange request token.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ExchangeResponseClaims {
    /// Always the self-issued issuer URL.
    pub iss: String,

    /// DID of the current credential owner, who signs the exchange.
    pub sub: String,

    /// Exchange endpoint the token is addressed to.
    pub aud: String,

    /// DID of the current credential owner.
    pub did: String,

    pub jti: String,
    pub iat: i64,
    pub exp: i64,

    /// The source credential token, verbatim.
    pub vc: String,

    /// Pairwise DID the re-issued credential must be bound to.
    pub recipient: String,
}

/// Formats an [`ExchangeRequest`] into one signed token for the issuer's
/// exchange endpoint.
pub struct ExchangeResponseFormatter {
    key_store: Arc<dyn KeyStore>,
}

impl ExchangeResponseFormatter {
    pub fn new(key_store: Arc<dyn KeyStore>) -> Self {
        ExchangeResponseFormatter { key_store }
    }

    /// Formats and signs the exchange request on behalf of its owner.
    ///
    /// # Errors
    /// `SdkError::Formatter` if the credential advertises no exchange
    /// endpoint; the caller must not fall back to a guessed audience.
    pub fn format_response(
        &self,
        request: &ExchangeRequest,
        expiry_in_seconds: i64,
    ) -> SdkResult<String> {
        if request.audience.is_empty() {
            return Err(SdkError::Formatter(
                "exchange request has no audience endpoint".to_string(),
            ));
        }
        let (iat, exp) = issued_and_expiry(expiry_in_seconds);
        let claims = ExchangeResponseClaims {
            iss: SELF_ISSUED.to_string(),
            sub: request.owner.id.clone(),
            aud: request.audience.clone(),
            did: request.owner.id.clone(),
            jti: Uuid::new_v4().to_string(),
            iat,
            exp,
            vc: request.verifiable_credential.raw.clone(),
            recipient: request.pairwise_did.clone(),
        };
        sign_claims(&claims, &request.owner, &self.key_store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::key_store::InMemoryKeyStore;
    use crate::models::credential::{VerifiableCredential, VerifiableCredentialContent};
    use crate::models::identifier::Identifier;
    use crate::token::jws::JwsToken;

    fn owner() -> Identifier {
        Identifier {
            id: "did:ion:holder".to_string(),
            name: "primary".to_string(),
            signature_key_ref: "sig_holder".to_string(),
            encryption_key_ref: "enc".to_string(),
            recovery_key_ref: "rec".to_string(),
        }
    }

    fn key_store() -> Arc<dyn KeyStore> {
        let store = InMemoryKeyStore::new();
        store.generate_signing_key("sig_holder", "sig_h").unwrap();
        Arc::new(store)
    }

    fn exchange_request(audience: &str) -> ExchangeRequest {
        ExchangeRequest {
            verifiable_credential: VerifiableCredential {
                jti: "vc-1".to_string(),
                raw: "a.b.c".to_string(),
                contents: VerifiableCredentialContent::default(),
                pic_id: "vc-1".to_string(),
            },
            pairwise_did: "did:ion:pairwise".to_string(),
            owner: owner(),
            audience: audience.to_string(),
        }
    }

    #[test]
    fn test_exchange_token_names_recipient_and_embeds_source() {
        let formatter = ExchangeResponseFormatter::new(key_store());
        let token = formatter
            .format_response(&exchange_request("https://issuer.example/exchange"), 600)
            .unwrap();
        let claims: ExchangeResponseClaims =
            JwsToken::decode(&token).unwrap().content().unwrap();

        assert_eq!(claims.iss, SELF_ISSUED);
        assert_eq!(claims.sub, "did:ion:holder");
        assert_eq!(claims.aud, "https://issuer.example/exchange");
        assert_eq!(claims.vc, "a.b.c");
        assert_eq!(claims.recipient, "did:ion:pairwise");
    }

    #[test]
    fn test_missing_audience_is_rejected() {
        let formatter = ExchangeResponseFormatter::new(key_store());
        let result = formatter.format_response(&exchange_request(""), 600);
        assert!(matches!(result, Err(SdkError::Formatter(_))));
    }
}
