// src/crypto/keys.rs
//! JSON Web Key model and conversions to secp256k1 keys.
//!
//! DID documents carry public keys as JWKs; the key store persists private
//! keys in the same shape. This module converts between the JWK wire format
//! and the `k256` key types used for ECDSA signing and verification.
//!
//! Only EC keys on secp256k1 are supported; any other `kty`/`crv` fails with
//! a key-format error rather than being silently skipped.

use crate::error::{SdkError, SdkResult};
use crate::utils::serialization::{decode_base64url, encode_base64url};
use k256::ecdsa::{SigningKey, VerifyingKey};
use k256::{EncodedPoint, FieldBytes};
use serde::{Deserialize, Serialize};

/// A JSON Web Key restricted to the shapes this SDK produces and consumes.
///
/// Public keys carry `x`/`y` affine coordinates; private keys additionally
/// carry the scalar `d`. All coordinate fields are base64url without padding.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct JsonWebKey {
    /// Key type; always "EC" for keys this SDK understands.
    pub kty: String,

    /// Curve name; "secp256k1" (the legacy alias "P-256K" is accepted).
    pub crv: String,

    /// Base64url-encoded affine x coordinate.
    pub x: String,

    /// Base64url-encoded affine y coordinate.
    pub y: String,

    /// Base64url-encoded private scalar; present only on private keys.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub d: Option<String>,

    /// Key identifier fragment, if the key carries one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
}

impl JsonWebKey {
    /// Strips the private scalar, leaving the public half of the key.
    pub fn to_public(&self) -> JsonWebKey {
        JsonWebKey { d: None, ..self.clone() }
    }

    /// Whether the key carries private material.
    pub fn is_private(&self) -> bool {
        self.d.is_some()
    }
}

fn check_key_type(jwk: &JsonWebKey) -> SdkResult<()> {
    if jwk.kty != "EC" {
        return Err(SdkError::KeyFormat(format!("unsupported key type '{}'", jwk.kty)));
    }
    if jwk.crv != "secp256k1" && jwk.crv != "P-256K" {
        return Err(SdkError::KeyFormat(format!("unsupported curve '{}'", jwk.crv)));
    }
    Ok(())
}

fn decode_coordinate(value: &str, name: &str) -> SdkResult<Vec<u8>> {
    let bytes = decode_base64url(value)
        .map_err(|_| SdkError::KeyFormat(format!("coordinate '{}' is not valid base64url", name)))?;
    if bytes.len() != 32 {
        return Err(SdkError::KeyFormat(format!(
            "coordinate '{}' must be 32 bytes, got {}",
            name,
            bytes.len()
        )));
    }
    Ok(bytes)
}

/// Converts a public JWK into a verification-capable secp256k1 key.
///
/// # Errors
/// `SdkError::KeyFormat` if the key type or curve is unsupported, a
/// coordinate is malformed, or the coordinates do not name a curve point.
pub fn verifying_key_from_jwk(jwk: &JsonWebKey) -> SdkResult<VerifyingKey> {
    check_key_type(jwk)?;
    let x = decode_coordinate(&jwk.x, "x")?;
    let y = decode_coordinate(&jwk.y, "y")?;
    let point = EncodedPoint::from_affine_coordinates(
        FieldBytes::from_slice(&x),
        FieldBytes::from_slice(&y),
        false,
    );
    VerifyingKey::from_encoded_point(&point)
        .map_err(|e| SdkError::KeyFormat(format!("coordinates are not a secp256k1 point: {}", e)))
}

/// Converts a private JWK into a signing-capable secp256k1 key.
///
/// # Errors
/// `SdkError::KeyFormat` if the key is not private or the scalar is invalid.
pub fn signing_key_from_jwk(jwk: &JsonWebKey) -> SdkResult<SigningKey> {
    check_key_type(jwk)?;
    let d = jwk
        .d
        .as_deref()
        .ok_or_else(|| SdkError::Key("key has no private material".to_string()))?;
    let scalar = decode_coordinate(d, "d")?;
    SigningKey::from_bytes(FieldBytes::from_slice(&scalar))
        .map_err(|e| SdkError::KeyFormat(format!("invalid private scalar: {}", e)))
}

/// Exports a signing key as a private JWK.
pub fn jwk_from_signing_key(key: &SigningKey, kid: Option<String>) -> SdkResult<JsonWebKey> {
    let mut jwk = jwk_from_verifying_key(key.verifying_key(), kid)?;
    jwk.d = Some(encode_base64url(&key.to_bytes()));
    Ok(jwk)
}

/// Exports a verifying key as a public JWK.
pub fn jwk_from_verifying_key(key: &VerifyingKey, kid: Option<String>) -> SdkResult<JsonWebKey> {
    let point = key.to_encoded_point(false);
    let x = point
        .x()
        .ok_or_else(|| SdkError::Key("public key has no x coordinate".to_string()))?;
    let y = point
        .y()
        .ok_or_else(|| SdkError::Key("public key has no y coordinate".to_string()))?;
    Ok(JsonWebKey {
        kty: "EC".to_string(),
        crv: "secp256k1".to_string(),
        x: encode_base64url(x),
        y: encode_base64url(y),
        d: None,
        kid,
    })
}
