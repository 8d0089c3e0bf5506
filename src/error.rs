// src/error.rs
//! Error taxonomy for the credential exchange SDK.
//!
//! Every fallible operation in the crate returns [`SdkResult`], and the first
//! failure in a multi-step operation aborts the remaining steps and is
//! returned to the caller untranslated. Variants carry a human-readable
//! reason so callers can distinguish "bad signature" from "expired" from
//! "unsupported protocol" without string matching.
//!
//! Only the network variants are retryable; the SDK itself never retries.

use thiserror::Error;

/// Root error type for all SDK operations.
#[derive(Error, Debug)]
pub enum SdkError {
    /// The key store could not complete a sign/save/lookup operation.
    #[error("key store failure: {0}")]
    KeyStore(String),

    /// A key exists but cannot be used for the requested operation.
    #[error("key failure: {0}")]
    Key(String),

    /// Key material could not be converted into a usable key.
    #[error("malformed key material: {0}")]
    KeyFormat(String),

    /// The token or key names an algorithm the SDK does not support.
    #[error("unsupported algorithm: {0}")]
    Algorithm(String),

    /// Producing a signature failed.
    #[error("signing failure: {0}")]
    Signature(String),

    /// Malformed compact serialization, base64url, or JSON input.
    #[error("malformed token: {0}")]
    Encoding(String),

    /// Pairwise identifier material could not be derived.
    #[error("pairwise key failure: {0}")]
    PairwiseKey(String),

    /// A token signature did not verify against any resolved key.
    #[error("invalid token signature: {0}")]
    InvalidSignature(String),

    /// A token's expiry is in the past beyond the configured clock skew.
    #[error("token has expired: {0}")]
    ExpiredToken(String),

    /// Any other validation failure (missing kid, unsupported protocol
    /// values, missing registration metadata).
    #[error("validation failure: {0}")]
    Validator(String),

    /// A response could not be serialized and signed.
    #[error("response formatting failure: {0}")]
    Formatter(String),

    /// DID resolution failed (network or not-found at the resolver).
    #[error("identifier resolution failure: {0}")]
    Resolver(String),

    /// DID registration failed at the registrar service.
    #[error("identifier registration failure: {0}")]
    Registrar(String),

    /// A presentation request could not be obtained or understood.
    #[error("presentation failure: {0}")]
    Presentation(String),

    /// An issuance request could not be obtained or understood.
    #[error("issuance failure: {0}")]
    Issuance(String),

    /// A pairwise credential exchange could not be formed or completed.
    #[error("credential exchange failure: {0}")]
    Exchange(String),

    /// The remote service could not be reached (transport error). Retryable.
    #[error("service unreachable: {0}")]
    ServiceUnreachable(String),

    /// The remote service answered with an error status. Retryable.
    #[error("service error: {0}")]
    ServiceError(String),

    /// The remote service rejected the caller's authorization. Retryable.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The backing repository failed a read or write.
    #[error("repository failure: {0}")]
    Repository(String),

    /// The operation is not supported by this SDK.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),
}

impl SdkError {
    /// Whether the caller may reasonably retry the failed operation.
    ///
    /// True only for network failures; all other failures are deterministic
    /// and retrying without changing the input cannot succeed.
    pub fn retryable(&self) -> bool {
        matches!(
            self,
            SdkError::ServiceUnreachable(_) | SdkError::ServiceError(_) | SdkError::Unauthorized(_)
        )
    }
}

/// Result alias used throughout the crate.
pub type SdkResult<T> = Result<T, SdkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_network_errors_are_retryable() {
        assert!(SdkError::ServiceUnreachable("timeout".into()).retryable());
        assert!(SdkError::ServiceError("500".into()).retryable());
        assert!(SdkError::Unauthorized("401".into()).retryable());

        assert!(!SdkError::InvalidSignature("bad".into()).retryable());
        assert!(!SdkError::ExpiredToken("old".into()).retryable());
        assert!(!SdkError::Exchange("empty audience".into()).retryable());
        assert!(!SdkError::Repository("insert failed".into()).retryable());
    }

    #[test]
    fn test_reason_strings_are_distinguishable() {
        let invalid = SdkError::InvalidSignature("signature does not verify".into()).to_string();
        let expired = SdkError::ExpiredToken("exp was 3600s ago".into()).to_string();
        let unsupported = SdkError::Validator("unsupported response_type 'code'".into()).to_string();

        assert!(invalid.contains("invalid token signature"));
        assert!(expired.contains("expired"));
        assert!(unsupported.contains("unsupported response_type"));
    }
}
