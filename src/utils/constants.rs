// src/utils/constants.rs
//! Protocol constants shared across the SDK.

/// Scheme of the deep-link URI that carries a presentation request.
pub const DEEP_LINK_SCHEME: &str = "openid";

/// Host of the deep-link URI that carries a presentation request.
pub const DEEP_LINK_HOST: &str = "vc";

/// Default lifetime, in seconds, of tokens produced by the formatters.
pub const DEFAULT_EXPIRATION_IN_SECONDS: i64 = 3600;

/// Default clock-skew tolerance, in seconds, applied to `exp`/`nbf`/`iat`.
pub const DEFAULT_CLOCK_SKEW_IN_SECONDS: i64 = 300;

/// Issuer claim of a self-issued OpenID Connect response.
pub const SELF_ISSUED: &str = "https://self-issued.me";

/// The only `response_type` the SDK accepts in presentation requests.
pub const RESPONSE_TYPE_ID_TOKEN: &str = "id_token";

/// The only `response_mode` the SDK accepts in presentation requests.
pub const RESPONSE_MODE_FORM_POST: &str = "form_post";

/// Signing algorithm used for all tokens (ECDSA over secp256k1, SHA-256).
pub const ALGORITHM_ES256K: &str = "ES256K";

/// Credential type marking a domain-linkage assertion.
pub const DOMAIN_LINKAGE_CREDENTIAL_TYPE: &str = "DomainLinkageCredential";
