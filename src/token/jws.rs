// src/token/jws.rs
//! Compact signed token codec.
//!
//! Implements the three-segment wire format
//! `base64url(header) . base64url(payload) . base64url(signature)`.
//! Decoding keeps the original header and payload segments verbatim so the
//! signing input is byte-identical to what the producer signed; encoding
//! serializes the header exactly once and reuses those bytes as the signing
//! input, keeping signature input canonical regardless of field order churn.
//!
//! Payload parsing is lazy: [`JwsToken::content`] deserializes into the
//! claim-set type the caller asks for, and parse failures surface as
//! `SdkError::Encoding`, never as silently-defaulted claims.

use crate::crypto::key_store::KeyStore;
use crate::error::{SdkError, SdkResult};
use crate::utils::serialization::{decode_base64url, encode_base64url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Protected header of a signed token.
///
/// Field order is the canonical serialization order; serde emits struct
/// fields in declaration order, so re-encoding a header this SDK produced is
/// deterministic.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct JwsHeader {
    /// Signing algorithm, e.g. "ES256K".
    pub alg: String,

    /// Key identifier, `did#fragment`, naming the signing key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,

    /// Token type, conventionally "JWT".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,
}

/// A compact signed token: header, payload, and one signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JwsToken {
    /// base64url header segment, kept verbatim for signature verification.
    protected: String,

    /// base64url payload segment, kept verbatim.
    payload: String,

    /// Raw signature bytes.
    signature: Vec<u8>,

    /// Decoded header.
    header: JwsHeader,
}

impl JwsToken {
    /// Decodes a compact serialization into a token.
    ///
    /// # Errors
    /// `SdkError::Encoding` if the input does not have exactly three
    /// segments, a segment is not valid base64url, or the header is not
    /// valid JSON.
    pub fn decode(raw: &str) -> SdkResult<Self> {
        let segments: Vec<&str> = raw.split('.').collect();
        if segments.len() != 3 {
            return Err(SdkError::Encoding(format!(
                "compact token must have 3 segments, got {}",
                segments.len()
            )));
        }
        let header_bytes = decode_base64url(segments[0])?;
        let header: JwsHeader = serde_json::from_slice(&header_bytes)
            .map_err(|e| SdkError::Encoding(format!("invalid token header: {}", e)))?;
        // Validate the payload segment's encoding eagerly; its JSON lazily.
        decode_base64url(segments[1])?;
        let signature = decode_base64url(segments[2])?;
        Ok(JwsToken {
            protected: segments[0].to_string(),
            payload: segments[1].to_string(),
            signature,
            header,
        })
    }

    /// Signs a payload into a token using a key held by the key store.
    ///
    /// # Arguments
    /// * `header` - Protected header; its `kid` must reference the key that
    ///   `signing_key_ref` resolves to in the key store
    /// * `payload` - Claim set to serialize as the payload segment
    /// * `signing_key_ref` - Key store reference used to sign
    /// * `key_store` - Capability performing the signature
    pub fn sign<T: Serialize>(
        header: JwsHeader,
        payload: &T,
        signing_key_ref: &str,
        key_store: &dyn KeyStore,
    ) -> SdkResult<Self> {
        let header_json = serde_json::to_vec(&header)
            .map_err(|e| SdkError::Encoding(format!("could not serialize header: {}", e)))?;
        let payload_json = serde_json::to_vec(payload)
            .map_err(|e| SdkError::Encoding(format!("could not serialize payload: {}", e)))?;
        let protected = encode_base64url(&header_json);
        let payload = encode_base64url(&payload_json);
        let signing_input = format!("{}.{}", protected, payload);
        let signature = key_store.sign(signing_key_ref, signing_input.as_bytes())?;
        Ok(JwsToken { protected, payload, signature, header })
    }

    /// Produces the compact serialization of the token.
    pub fn encode(&self) -> String {
        format!("{}.{}.{}", self.protected, self.payload, encode_base64url(&self.signature))
    }

    /// The decoded protected header.
    pub fn header(&self) -> &JwsHeader {
        &self.header
    }

    /// Key identifier from the header, if present.
    pub fn kid(&self) -> Option<&str> {
        self.header.kid.as_deref()
    }

    /// Bytes the signature covers: `header_segment "." payload_segment`.
    pub fn signing_input(&self) -> Vec<u8> {
        format!("{}.{}", self.protected, self.payload).into_bytes()
    }

    /// Raw signature bytes.
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// Parses the payload into the requested claim-set type.
    ///
    /// # Errors
    /// `SdkError::Encoding` if the payload is not valid JSON for `T`.
    pub fn content<T: DeserializeOwned>(&self) -> SdkResult<T> {
        let bytes = decode_base64url(&self.payload)?;
        serde_json::from_slice(&bytes)
            .map_err(|e| SdkError::Encoding(format!("invalid token payload: {}", e)))
    }
}
