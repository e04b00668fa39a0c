//! JWT-backed session token verification.
//!
//! The bundled [`crate::auth::TokenVerifier`] implementation. Supports a
//! static HS256 secret or an RS256 JWKS endpoint; issuer and audience
//! validation are applied when configured.

use crate::auth::storage::TokenVerifier;
use crate::config::AuthConfig;
use crate::error::{GreenroomError, Result};
use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Claims carried by a Greenroom session token. Only the subject is
/// consumed; session tokens never carry organizational context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Account id the session belongs to.
    pub sub: String,
    /// Expiry, validated by `jsonwebtoken`.
    pub exp: u64,
}

/// JSON Web Key as served by the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Jwk {
    pub kty: String,
    pub kid: Option<String>,
    pub n: String,
    pub e: String,
}

/// JWK Set containing the provider's signing keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwkSet {
    pub keys: Vec<Jwk>,
}

impl JwkSet {
    /// Fetch a JWK Set from the provider.
    pub async fn fetch(url: &str) -> Result<Self> {
        let response = reqwest::Client::new()
            .get(url)
            .send()
            .await
            .map_err(|e| GreenroomError::internal(format!("Failed to fetch JWKS: {e}")))?;

        if !response.status().is_success() {
            return Err(GreenroomError::internal(format!(
                "JWKS endpoint returned status: {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| GreenroomError::internal(format!("Failed to parse JWKS: {e}")))
    }

    fn find_by_kid(&self, kid: &str) -> Option<&Jwk> {
        self.keys
            .iter()
            .find(|jwk| jwk.kid.as_deref() == Some(kid))
    }
}

/// Session token verifier backed by `jsonwebtoken`.
#[derive(Clone)]
pub struct JwtSessionVerifier {
    decoding_key: Option<DecodingKey>,
    jwks: Arc<RwLock<Option<JwkSet>>>,
    jwks_url: Option<String>,
    validation: Validation,
}

impl JwtSessionVerifier {
    /// Verifier using a static HS256 secret.
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            decoding_key: Some(DecodingKey::from_secret(secret)),
            jwks: Arc::new(RwLock::new(None)),
            jwks_url: None,
            validation: base_validation(Algorithm::HS256),
        }
    }

    /// Verifier fetching RS256 keys from a JWKS endpoint.
    pub async fn from_jwks_url(url: impl Into<String>) -> Result<Self> {
        let url = url.into();
        let jwks = JwkSet::fetch(&url).await?;
        Ok(Self {
            decoding_key: None,
            jwks: Arc::new(RwLock::new(Some(jwks))),
            jwks_url: Some(url),
            validation: base_validation(Algorithm::RS256),
        })
    }

    /// Build from [`AuthConfig`]: `jwks_url` wins over `jwt_secret`.
    pub async fn from_config(config: &AuthConfig) -> Result<Self> {
        let mut verifier = if let Some(url) = &config.jwks_url {
            Self::from_jwks_url(url.clone()).await?
        } else if let Some(secret) = &config.jwt_secret {
            Self::from_secret(secret.as_bytes())
        } else {
            return Err(GreenroomError::internal(
                "Auth config needs jwt_secret or jwks_url",
            ));
        };
        if let Some(issuer) = &config.jwt_issuer {
            verifier = verifier.with_issuer(issuer);
        }
        if let Some(audience) = &config.jwt_audience {
            verifier = verifier.with_audience(audience);
        }
        Ok(verifier)
    }

    pub fn with_issuer(mut self, issuer: &str) -> Self {
        self.validation.set_issuer(&[issuer]);
        self
    }

    pub fn with_audience(mut self, audience: &str) -> Self {
        self.validation.set_audience(&[audience]);
        self
    }

    async fn decoding_key_for(&self, token: &str) -> Result<Option<DecodingKey>> {
        if let Some(key) = &self.decoding_key {
            return Ok(Some(key.clone()));
        }

        let header = match decode_header(token) {
            Ok(header) => header,
            Err(_) => return Ok(None),
        };
        let Some(kid) = header.kid else {
            return Ok(None);
        };

        if let Some(key) = self.rsa_key_for_kid(&kid).await? {
            return Ok(Some(key));
        }

        // Unknown kid: the provider may have rotated keys since the last
        // fetch. Refresh once before giving up.
        if let Some(url) = &self.jwks_url {
            let fresh = JwkSet::fetch(url).await?;
            *self.jwks.write().await = Some(fresh);
            return self.rsa_key_for_kid(&kid).await;
        }

        Ok(None)
    }

    async fn rsa_key_for_kid(&self, kid: &str) -> Result<Option<DecodingKey>> {
        let jwks = self.jwks.read().await;
        let Some(jwk) = jwks.as_ref().and_then(|set| set.find_by_kid(kid)) else {
            return Ok(None);
        };
        let key = DecodingKey::from_rsa_components(&jwk.n, &jwk.e)
            .map_err(|e| GreenroomError::internal(format!("Bad JWK components: {e}")))?;
        Ok(Some(key))
    }
}

fn base_validation(algorithm: Algorithm) -> Validation {
    let mut validation = Validation::new(algorithm);
    validation.validate_exp = true;
    validation
}

#[async_trait]
impl TokenVerifier for JwtSessionVerifier {
    async fn verify(&self, token: &str) -> Result<Option<String>> {
        let Some(key) = self.decoding_key_for(token).await? else {
            return Ok(None);
        };

        match decode::<SessionClaims>(token, &key, &self.validation) {
            Ok(data) => Ok(Some(data.claims.sub)),
            Err(_) => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use std::time::{SystemTime, UNIX_EPOCH};

    const SECRET: &[u8] = b"test-secret";

    fn token(sub: &str, offset_secs: i64) -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64;
        let claims = SessionClaims {
            sub: sub.to_string(),
            exp: (now + offset_secs).max(0) as u64,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn valid_token_resolves_subject() {
        let verifier = JwtSessionVerifier::from_secret(SECRET);
        let account = verifier.verify(&token("acct-1", 3600)).await.unwrap();
        assert_eq!(account.as_deref(), Some("acct-1"));
    }

    #[tokio::test]
    async fn expired_token_is_rejected_not_an_error() {
        let verifier = JwtSessionVerifier::from_secret(SECRET);
        let account = verifier.verify(&token("acct-1", -3600)).await.unwrap();
        assert_eq!(account, None);
    }

    #[tokio::test]
    async fn wrong_secret_is_rejected() {
        let verifier = JwtSessionVerifier::from_secret(b"other-secret");
        let account = verifier.verify(&token("acct-1", 3600)).await.unwrap();
        assert_eq!(account, None);
    }

    #[tokio::test]
    async fn garbage_token_is_rejected() {
        let verifier = JwtSessionVerifier::from_secret(SECRET);
        let account = verifier.verify("not-a-jwt").await.unwrap();
        assert_eq!(account, None);
    }
}
