// src/token/mod.rs

pub mod jws; // Compact signed token codec
