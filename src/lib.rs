// src/lib.rs
//! Verifiable credential exchange SDK over a DID substrate.
//!
//! The crate issues, presents, and exchanges verifiable credentials as
//! compact signed JSON tokens, following the OpenID self-issued
//! request/response protocol. Signature trust is rooted in DID resolution:
//! a token's `kid` names a `did#fragment`, the DID document supplies the
//! public keys.
//!
//! The entry point is [`service::manager::VerifiableCredentialManager`],
//! which drives both flows over injected collaborators:
//!
//! - [`service::repository::Repository`] for holder-side storage,
//! - [`service::network::Network`] for HTTP transport,
//! - [`resolver::Resolver`] for DID resolution,
//! - [`crypto::key_store::KeyStore`] for signing.
//!
//! In-memory and reqwest-backed reference implementations of each are
//! provided; platform integrations implement the same traits.

pub mod crypto;     // Keys and the key store capability
pub mod error;      // SdkError taxonomy
pub mod formatters; // Response formatters
pub mod models;     // Protocol and storage data model
pub mod resolver;   // DID resolution
pub mod service;    // Requests, responses, storage, network, engine
pub mod token;      // Compact signed token codec
pub mod utils;      // Constants and serialization helpers
pub mod validators; // Signature, domain-linkage, and request validators

pub use error::{SdkError, SdkResult};
pub use service::manager::VerifiableCredentialManager;
