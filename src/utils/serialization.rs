// src/utils/serialization.rs
//! Serialization utilities for the credential exchange SDK.
//!
//! Provides serialization and deserialization functions for:
//! - JSON data structures
//! - base64url segments of compact tokens (no padding, URL-safe alphabet)

use crate::error::{SdkError, SdkResult};
use serde::{de::DeserializeOwned, Serialize};

/// Serializes a value to a JSON string.
///
/// # Arguments
/// * `data` - The value to serialize (must implement `Serialize`)
///
/// # Returns
/// - `Ok(String)` with JSON representation on success
/// - `Err(SdkError::Encoding)` if serialization fails
pub fn serialize<T: Serialize>(data: &T) -> SdkResult<String> {
    serde_json::to_string(data).map_err(|e| SdkError::Encoding(format!("JSON serialization failed: {}", e)))
}

/// Deserializes a value from a JSON string.
///
/// # Arguments
/// * `data` - JSON string to deserialize
///
/// # Returns
/// - `Ok(T)` with deserialized value on success
/// - `Err(SdkError::Encoding)` if deserialization fails
pub fn deserialize<T: DeserializeOwned>(data: &str) -> SdkResult<T> {
    serde_json::from_str(data).map_err(|e| SdkError::Encoding(format!("JSON deserialization failed: {}", e)))
}

/// Encodes bytes as a base64url string without padding.
///
/// This is the segment encoding of the compact token wire format:
/// `base64url(header) . base64url(payload) . base64url(signature)`.
pub fn encode_base64url(data: &[u8]) -> String {
    base64::encode_config(data, base64::URL_SAFE_NO_PAD)
}

/// Decodes a base64url segment (no padding) back into bytes.
///
/// # Returns
/// - `Ok(Vec<u8>)` with the decoded bytes
/// - `Err(SdkError::Encoding)` if the input is not valid base64url
pub fn decode_base64url(data: &str) -> SdkResult<Vec<u8>> {
    base64::decode_config(data, base64::URL_SAFE_NO_PAD)
        .map_err(|e| SdkError::Encoding(format!("base64url decoding failed: {}", e)))
}
