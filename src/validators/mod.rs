// src/validators/mod.rs

pub mod domain_linkage;       // DID configuration document validation
pub mod jws_validator;        // Token signature validation via DID resolution
pub mod presentation_request; // Presentation request validation
