//! Request-scoped authentication context.

use crate::auth::credential::CredentialResolver;
use crate::auth::overrides::{OverrideParams, OverrideValidator};
use crate::error::Result;
use axum::http::HeaderMap;

/// The authoritative identity for one request.
///
/// Built once per request and immutable afterwards; never cached across
/// requests. Every handler consumes one of these.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Effective account id, after any authorized account override.
    pub account_id: String,
    /// Effective organization context. Non-`None` only when the API key
    /// carries one or a caller-supplied override was authorized.
    pub organization_id: Option<String>,
    /// The raw credential value, forwarded to collaborators that need it.
    pub auth_token: String,
}

/// Composes credential resolution and override validation into an
/// [`AuthContext`].
#[derive(Clone)]
pub struct AuthContextBuilder {
    resolver: CredentialResolver,
    overrides: OverrideValidator,
}

impl AuthContextBuilder {
    pub fn new(resolver: CredentialResolver, overrides: OverrideValidator) -> Self {
        Self {
            resolver,
            overrides,
        }
    }

    /// Build the context for one request. Fail-fast: the first failing
    /// step aborts the pipeline.
    ///
    /// Step order is a correctness requirement, not a convenience:
    /// the organization override is authorized against the account the
    /// caller will actually act as, so the account override (step 2) must
    /// land before the membership check in step 3. Anything else would
    /// let a caller launder organization access through an account
    /// override that was only valid under the original identity.
    pub async fn build(&self, headers: &HeaderMap, overrides: OverrideParams) -> Result<AuthContext> {
        let overrides = overrides.normalized();

        // 1. Resolve the credential.
        let (identity, credential) = self.resolver.resolve(headers).await?;

        // 2. Account override.
        let account_id = self
            .overrides
            .account(&identity, overrides.account_id.as_deref())
            .await?;

        // 3. Organization override, checked for the final account id.
        let organization_id = self
            .overrides
            .organization(
                &account_id,
                identity.organization_id.clone(),
                overrides.organization_id.as_deref(),
            )
            .await?;

        tracing::debug!(
            account_id = %account_id,
            organization_id = organization_id.as_deref().unwrap_or("-"),
            "auth context built"
        );

        Ok(AuthContext {
            account_id,
            organization_id,
            auth_token: credential.value().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::credential::CredentialResolver;
    use crate::error::GreenroomError;
    use crate::testing::{InMemoryApiKeys, InMemoryMemberships, StaticTokenVerifier};
    use std::sync::Arc;

    const ADMIN_ORG: &str = "org-admin";

    struct Fixture {
        api_keys: Arc<InMemoryApiKeys>,
        memberships: Arc<InMemoryMemberships>,
        builder: AuthContextBuilder,
    }

    fn fixture() -> Fixture {
        let api_keys = Arc::new(InMemoryApiKeys::new());
        let tokens = Arc::new(StaticTokenVerifier::new());
        let memberships = Arc::new(InMemoryMemberships::new());
        let builder = AuthContextBuilder::new(
            CredentialResolver::new(api_keys.clone(), tokens, "x-api-key"),
            OverrideValidator::new(memberships.clone(), ADMIN_ORG),
        );
        Fixture {
            api_keys,
            memberships,
            builder,
        }
    }

    fn key_headers(key: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", key.parse().unwrap());
        headers
    }

    #[tokio::test]
    async fn no_overrides_yields_key_identity() {
        let fx = fixture();
        fx.api_keys.insert("gk_1", "acct-1", Some("org-1"));

        let ctx = fx
            .builder
            .build(&key_headers("gk_1"), OverrideParams::default())
            .await
            .unwrap();
        assert_eq!(ctx.account_id, "acct-1");
        assert_eq!(ctx.organization_id.as_deref(), Some("org-1"));
        assert_eq!(ctx.auth_token, "gk_1");
    }

    #[tokio::test]
    async fn org_override_checked_against_overridden_account() {
        let fx = fixture();
        fx.api_keys.insert("gk_1", "acct-1", Some("org-1"));
        fx.memberships.insert("acct-2", "org-1");
        // acct-2, not acct-1, belongs to org-2.
        fx.memberships.insert("acct-2", "org-2");

        let ctx = fx
            .builder
            .build(
                &key_headers("gk_1"),
                OverrideParams {
                    account_id: Some("acct-2".into()),
                    organization_id: Some("org-2".into()),
                },
            )
            .await
            .unwrap();
        assert_eq!(ctx.account_id, "acct-2");
        assert_eq!(ctx.organization_id.as_deref(), Some("org-2"));
    }

    #[tokio::test]
    async fn failed_account_override_short_circuits() {
        let fx = fixture();
        fx.api_keys.insert("gk_1", "acct-1", Some("org-1"));
        // acct-1 is a member of org-2, but the account override fails
        // first, so the org override is never evaluated.
        fx.memberships.insert("acct-1", "org-2");

        let err = fx
            .builder
            .build(
                &key_headers("gk_1"),
                OverrideParams {
                    account_id: Some("acct-outsider".into()),
                    organization_id: Some("org-2".into()),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, GreenroomError::Forbidden(_)));
        // Only the account-override membership check ran.
        assert_eq!(fx.memberships.is_member_calls(), 1);
    }

    #[tokio::test]
    async fn undefined_overrides_are_ignored() {
        let fx = fixture();
        fx.api_keys.insert("gk_1", "acct-1", None);

        let ctx = fx
            .builder
            .build(
                &key_headers("gk_1"),
                OverrideParams {
                    account_id: Some("undefined".into()),
                    organization_id: Some(String::new()),
                },
            )
            .await
            .unwrap();
        assert_eq!(ctx.account_id, "acct-1");
        assert_eq!(ctx.organization_id, None);
    }
}
