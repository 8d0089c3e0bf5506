// src/crypto/mod.rs

pub mod key_store; // Key store capability and in-memory implementation
pub mod keys;      // JWK model and conversions to k256 keys
