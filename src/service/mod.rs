// src/service/mod.rs

pub mod manager;    // Credential exchange engine
pub mod network;    // Network collaborator interface and HTTP adapter
pub mod repository; // Repository collaborator interface and in-memory impl
pub mod request;    // Issuance and presentation requests
pub mod response;   // Issuance and presentation responses
