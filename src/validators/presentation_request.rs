// src/validators/presentation_request.rs
//! Presentation request validation.
//!
//! A presentation request is validated exactly once, before any response is
//! built from it: signature via DID resolution, token lifetime against the
//! configured clock skew, supported protocol values, and presence of
//! relying-party registration metadata when claims are requested. Failures
//! are typed and carry a human-readable reason; none are retried here.

use crate::error::{SdkError, SdkResult};
use crate::models::oidc::OidcRequestContent;
use crate::service::request::PresentationRequest;
use crate::token::jws::JwsToken;
use crate::utils::constants::{
    DEFAULT_CLOCK_SKEW_IN_SECONDS, RESPONSE_MODE_FORM_POST, RESPONSE_TYPE_ID_TOKEN,
};
use crate::validators::jws_validator::JwsValidator;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

/// Tunables for request validation.
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    /// Tolerance applied to `exp`, `nbf`, and `iat` comparisons.
    pub clock_skew: Duration,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        ValidatorConfig { clock_skew: Duration::seconds(DEFAULT_CLOCK_SKEW_IN_SECONDS) }
    }
}

/// Validates presentation requests before a response is formed.
pub struct PresentationRequestValidator {
    jws_validator: Arc<JwsValidator>,
    config: ValidatorConfig,
}

impl PresentationRequestValidator {
    /// Creates a validator with the given signature validator and config.
    pub fn new(jws_validator: Arc<JwsValidator>, config: ValidatorConfig) -> Self {
        PresentationRequestValidator { jws_validator, config }
    }

    /// Validates a presentation request.
    ///
    /// # Errors
    /// - `SdkError::InvalidSignature` if the request token's signature does
    ///   not verify against the requester's DID document
    /// - `SdkError::ExpiredToken` if `exp` is past beyond the clock skew
    /// - `SdkError::Validator` for tokens not yet valid, unsupported
    ///   `response_type`/`response_mode`, or missing registration metadata
    pub async fn validate(&self, request: &PresentationRequest) -> SdkResult<()> {
        let token = JwsToken::decode(&request.serialized_token)?;
        if !self.jws_validator.verify_signature(&token).await? {
            return Err(SdkError::InvalidSignature(
                "presentation request signature does not verify against requester keys".to_string(),
            ));
        }
        self.check_token_time(&request.content, Utc::now())?;
        check_protocol_values(&request.content)?;
        check_registration(&request.content)?;
        Ok(())
    }

    fn check_token_time(&self, content: &OidcRequestContent, now: DateTime<Utc>) -> SdkResult<()> {
        let skew = self.config.clock_skew;
        let now = now.timestamp();
        let skew = skew.num_seconds();

        if now - skew > content.exp {
            return Err(SdkError::ExpiredToken(format!(
                "request expired at {} ({}s past the skew window)",
                content.exp,
                now - skew - content.exp
            )));
        }
        if content.nbf > now + skew {
            return Err(SdkError::Validator(format!(
                "request is not valid before {}",
                content.nbf
            )));
        }
        if content.iat > now + skew {
            return Err(SdkError::Validator(format!(
                "request claims to be issued in the future at {}",
                content.iat
            )));
        }
        Ok(())
    }
}

fn check_protocol_values(content: &OidcRequestContent) -> SdkResult<()> {
    if content.response_type != RESPONSE_TYPE_ID_TOKEN {
        return Err(SdkError::Validator(format!(
            "unsupported response_type '{}', expected '{}'",
            content.response_type, RESPONSE_TYPE_ID_TOKEN
        )));
    }
    if content.response_mode != RESPONSE_MODE_FORM_POST {
        return Err(SdkError::Validator(format!(
            "unsupported response_mode '{}', expected '{}'",
            content.response_mode, RESPONSE_MODE_FORM_POST
        )));
    }
    Ok(())
}

fn check_registration(content: &OidcRequestContent) -> SdkResult<()> {
    let claims_requested = content
        .attestations
        .as_ref()
        .map(|attestations| !attestations.is_empty())
        .unwrap_or(false)
        || content
            .presentation_definition
            .as_ref()
            .map(|definition| !definition.input_descriptors.is_empty())
            .unwrap_or(false);
    if claims_requested && content.registration.is_none() {
        return Err(SdkError::Validator(
            "request asks for claims but carries no registration metadata".to_string(),
        ));
    }
    Ok(())
}
