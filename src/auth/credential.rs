//! Credential extraction and resolution.
//!
//! A request authenticates with exactly one of two schemes: an opaque API
//! key header, or an `Authorization: Bearer` session token. Presence of
//! both or neither is rejected before any store lookup happens.

use crate::auth::storage::{ApiKeyStore, TokenVerifier};
use crate::error::{GreenroomError, Result};
use axum::http::HeaderMap;
use std::sync::Arc;

/// A credential extracted from request headers. Closed tagged union:
/// every downstream branch is a single pattern match on this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    /// Opaque API key, looked up verbatim in the store.
    ApiKey(String),
    /// Bearer session token, already stripped of its `Bearer ` prefix.
    BearerToken(String),
}

impl Credential {
    /// Extract exactly one credential from request headers.
    ///
    /// `api_key_header` is the configured header name for API keys
    /// (default `x-api-key`). The exactly-one rule is enforced here,
    /// before any store access.
    pub fn from_headers(headers: &HeaderMap, api_key_header: &str) -> Result<Self> {
        let api_key = headers
            .get(api_key_header)
            .and_then(|value| value.to_str().ok());
        let authorization = headers
            .get("authorization")
            .and_then(|value| value.to_str().ok());

        match (api_key, authorization) {
            (Some(_), Some(_)) => Err(GreenroomError::AmbiguousCredential),
            (None, None) => Err(GreenroomError::MissingCredential),
            (Some(key), None) => {
                if key.is_empty() {
                    return Err(GreenroomError::invalid_credential("Empty API key"));
                }
                Ok(Self::ApiKey(key.to_string()))
            }
            (None, Some(header)) => {
                // Prefix match is case-insensitive; the token itself is not.
                let token = header
                    .get(..7)
                    .filter(|prefix| prefix.eq_ignore_ascii_case("bearer "))
                    .map(|_| &header[7..])
                    .ok_or_else(|| {
                        GreenroomError::invalid_credential(
                            "Invalid authorization header format. Expected: Bearer <token>",
                        )
                    })?;

                if token.is_empty() {
                    return Err(GreenroomError::invalid_credential("Empty bearer token"));
                }
                Ok(Self::BearerToken(token.to_string()))
            }
        }
    }

    /// The raw credential value, carried into the auth context.
    pub fn value(&self) -> &str {
        match self {
            Self::ApiKey(value) | Self::BearerToken(value) => value,
        }
    }
}

/// The identity a credential resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentity {
    pub account_id: String,
    /// `None` for personal keys and for all bearer tokens; session tokens
    /// never carry organizational context.
    pub organization_id: Option<String>,
}

/// Resolves a [`Credential`] against the credential stores.
#[derive(Clone)]
pub struct CredentialResolver {
    api_keys: Arc<dyn ApiKeyStore>,
    tokens: Arc<dyn TokenVerifier>,
    api_key_header: String,
}

impl CredentialResolver {
    pub fn new(
        api_keys: Arc<dyn ApiKeyStore>,
        tokens: Arc<dyn TokenVerifier>,
        api_key_header: impl Into<String>,
    ) -> Self {
        Self {
            api_keys,
            tokens,
            api_key_header: api_key_header.into(),
        }
    }

    /// Extract and resolve the request's credential.
    ///
    /// Returns the resolved identity together with the raw credential,
    /// or the first failure in extraction/verification order.
    pub async fn resolve(&self, headers: &HeaderMap) -> Result<(ResolvedIdentity, Credential)> {
        let credential = Credential::from_headers(headers, &self.api_key_header)?;

        let identity = match &credential {
            Credential::ApiKey(key) => {
                let record = self
                    .api_keys
                    .find_by_key(key)
                    .await?
                    .filter(|record| !record.revoked)
                    .ok_or_else(|| GreenroomError::invalid_credential("Unknown API key"))?;
                ResolvedIdentity {
                    account_id: record.account_id,
                    organization_id: record.organization_id,
                }
            }
            Credential::BearerToken(token) => {
                let account_id = self
                    .tokens
                    .verify(token)
                    .await?
                    .ok_or_else(|| GreenroomError::invalid_credential("Invalid session token"))?;
                ResolvedIdentity {
                    account_id,
                    organization_id: None,
                }
            }
        };

        Ok((identity, credential))
    }
}
