// src/utils/mod.rs

pub mod constants;     // Protocol constants
pub mod serialization; // JSON and base64url helpers
