// src/models/mod.rs

pub mod attestations; // Claim attestation shapes carried by requests
pub mod contract;     // Verifiable credential contracts
pub mod credential;   // Verifiable credentials and holder wrappers
pub mod did_document; // DID documents produced by resolution
pub mod identifier;   // Holder-side identifiers
pub mod oidc;         // OpenID Connect request content
pub mod receipt;      // Issuance/presentation audit receipts
