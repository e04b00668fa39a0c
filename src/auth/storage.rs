//! Credential storage traits.
//!
//! Credential *storage* (hashing, rotation) lives outside this crate;
//! these traits expose only what resolution needs.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Metadata stored alongside an API key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKeyRecord {
    /// Account the key was issued to.
    pub account_id: String,
    /// Organization affiliation; `None` for personal keys.
    pub organization_id: Option<String>,
    /// Revoked keys fail resolution like unknown keys.
    pub revoked: bool,
}

/// Lookup of API keys by their opaque value.
///
/// # Example
///
/// ```rust,ignore
/// use greenroom::auth::{ApiKeyStore, ApiKeyRecord};
/// use async_trait::async_trait;
///
/// struct PgApiKeyStore { pool: PgPool }
///
/// #[async_trait]
/// impl ApiKeyStore for PgApiKeyStore {
///     async fn find_by_key(&self, key: &str) -> Result<Option<ApiKeyRecord>> {
///         // SELECT account_id, organization_id, revoked FROM api_keys ...
///     }
/// }
/// ```
#[async_trait]
pub trait ApiKeyStore: Send + Sync {
    /// Look up an API key. `None` means the key does not exist.
    async fn find_by_key(&self, key: &str) -> Result<Option<ApiKeyRecord>>;
}

/// Verification of bearer session tokens.
///
/// Session tokens carry no organizational context; a valid token resolves
/// to the account id only. [`crate::auth::JwtSessionVerifier`] is the
/// bundled implementation.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Verify a token. `Ok(None)` means the token is invalid or expired;
    /// `Err` is reserved for unexpected verifier failures.
    async fn verify(&self, token: &str) -> Result<Option<String>>;
}
