//! Resource scope construction and the ownership gate.
//!
//! An [`AccessScope`] is the resolved answer to "which account ids may
//! this request touch". It is built fresh per request from the
//! [`AuthContext`] and an optional caller-supplied account filter, by one
//! decision table shared across every resource type. List queries pass
//! the scope to their store; single-resource mutations run the fetched
//! resource through the ownership gate.

use crate::auth::{AuthContext, OverrideValidator, ResolvedIdentity, normalize_override};
use crate::error::{GreenroomError, Result};
use crate::organizations::MembershipStore;
use std::sync::Arc;

/// The set of account ids a request's queries are permitted to touch.
///
/// `Restricted(vec![])` matches nothing. It is not the unrestricted
/// sentinel and must never degrade into one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessScope {
    /// No account filter; all records are reachable. Granted only to the
    /// admin organization.
    Unrestricted,
    /// Only records owned by one of these account ids are reachable.
    Restricted(Vec<String>),
}

impl AccessScope {
    /// The account filter for store queries. `None` means unrestricted.
    pub fn account_ids(&self) -> Option<&[String]> {
        match self {
            Self::Unrestricted => None,
            Self::Restricted(ids) => Some(ids),
        }
    }

    /// Ownership gate: may this scope touch a resource owned by
    /// `owner_account_id`?
    ///
    /// An unowned resource (`None`) is public and always permitted. An
    /// owned resource is permitted iff the owner falls inside the scope.
    pub fn permits(&self, owner_account_id: Option<&str>) -> bool {
        match owner_account_id {
            None => true,
            Some(owner) => match self {
                Self::Unrestricted => true,
                Self::Restricted(ids) => ids.iter().any(|id| id == owner),
            },
        }
    }
}

/// Gate a fetched resource against the caller's scope.
///
/// A missing resource and a resource outside the scope are deliberately
/// indistinguishable in the result: both produce the same 404 so callers
/// cannot probe for the existence of resources they may not access.
pub fn gate_resource<T>(
    resource: Option<T>,
    owner: impl FnOnce(&T) -> Option<&str>,
    scope: &AccessScope,
    kind: &str,
    id: &str,
) -> Result<T> {
    match resource {
        Some(resource) if scope.permits(owner(&resource)) => Ok(resource),
        _ => Err(GreenroomError::not_found(format!("{kind} {id}"))),
    }
}

/// Builds an [`AccessScope`] from an [`AuthContext`].
///
/// One instance serves every resource type; resource-specific filters
/// (artist id, and so on) are plain data applied by the stores, never a
/// reason to reimplement this table.
#[derive(Clone)]
pub struct ScopeBuilder {
    memberships: Arc<dyn MembershipStore>,
    overrides: OverrideValidator,
}

impl ScopeBuilder {
    pub fn new(memberships: Arc<dyn MembershipStore>, overrides: OverrideValidator) -> Self {
        Self {
            memberships,
            overrides,
        }
    }

    /// Evaluate the scope decision table, in order:
    ///
    /// 1. a target account filter, once authorized like an account
    ///    override, narrows the scope to exactly that account;
    /// 2. the admin organization gets unrestricted scope;
    /// 3. an organization credential covers the organization's members
    ///    (possibly none);
    /// 4. a personal credential covers only the caller.
    pub async fn build(
        &self,
        ctx: &AuthContext,
        target_account_id: Option<&str>,
    ) -> Result<AccessScope> {
        let target = normalize_override(target_account_id.map(String::from));

        if let Some(target) = target {
            let identity = ResolvedIdentity {
                account_id: ctx.account_id.clone(),
                organization_id: ctx.organization_id.clone(),
            };
            let account_id = self.overrides.account(&identity, Some(&target)).await?;
            return Ok(AccessScope::Restricted(vec![account_id]));
        }

        if self.overrides.is_admin(ctx.organization_id.as_deref()) {
            return Ok(AccessScope::Unrestricted);
        }

        if let Some(organization_id) = &ctx.organization_id {
            let members = self.memberships.list_member_ids(organization_id).await?;
            return Ok(AccessScope::Restricted(members));
        }

        Ok(AccessScope::Restricted(vec![ctx.account_id.clone()]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::InMemoryMemberships;

    const ADMIN_ORG: &str = "org-admin";

    fn ctx(account_id: &str, organization_id: Option<&str>) -> AuthContext {
        AuthContext {
            account_id: account_id.to_string(),
            organization_id: organization_id.map(String::from),
            auth_token: "gk_test".to_string(),
        }
    }

    fn builder(memberships: &Arc<InMemoryMemberships>) -> ScopeBuilder {
        ScopeBuilder::new(
            memberships.clone(),
            OverrideValidator::new(memberships.clone(), ADMIN_ORG),
        )
    }

    #[tokio::test]
    async fn personal_credential_scopes_to_self() {
        let memberships = Arc::new(InMemoryMemberships::new());
        let scope = builder(&memberships)
            .build(&ctx("acct-1", None), None)
            .await
            .unwrap();
        assert_eq!(scope, AccessScope::Restricted(vec!["acct-1".to_string()]));
    }

    #[tokio::test]
    async fn org_credential_scopes_to_members() {
        let memberships = Arc::new(InMemoryMemberships::new());
        memberships.insert("m1", "org-1");
        memberships.insert("m2", "org-1");

        let scope = builder(&memberships)
            .build(&ctx("acct-1", Some("org-1")), None)
            .await
            .unwrap();
        match scope {
            AccessScope::Restricted(mut ids) => {
                ids.sort();
                assert_eq!(ids, vec!["m1".to_string(), "m2".to_string()]);
            }
            AccessScope::Unrestricted => panic!("expected restricted scope"),
        }
    }

    #[tokio::test]
    async fn empty_org_scopes_to_nothing() {
        let memberships = Arc::new(InMemoryMemberships::new());
        let scope = builder(&memberships)
            .build(&ctx("acct-1", Some("org-empty")), None)
            .await
            .unwrap();
        assert_eq!(scope, AccessScope::Restricted(vec![]));
        // An empty member list matches nothing, not everything.
        assert!(!scope.permits(Some("acct-1")));
        assert!(!scope.permits(Some("")));
        assert!(!scope.permits(Some("null")));
    }

    #[tokio::test]
    async fn admin_without_filter_is_unrestricted() {
        let memberships = Arc::new(InMemoryMemberships::new());
        let scope = builder(&memberships)
            .build(&ctx("acct-root", Some(ADMIN_ORG)), None)
            .await
            .unwrap();
        assert_eq!(scope, AccessScope::Unrestricted);
        assert_eq!(memberships.list_calls(), 0);
    }

    #[tokio::test]
    async fn admin_with_filter_narrows_without_lookup() {
        let memberships = Arc::new(InMemoryMemberships::new());
        let scope = builder(&memberships)
            .build(&ctx("acct-root", Some(ADMIN_ORG)), Some("acct-42"))
            .await
            .unwrap();
        assert_eq!(scope, AccessScope::Restricted(vec!["acct-42".to_string()]));
        assert_eq!(memberships.is_member_calls(), 0);
        assert_eq!(memberships.list_calls(), 0);
    }

    #[tokio::test]
    async fn org_filter_requires_membership() {
        let memberships = Arc::new(InMemoryMemberships::new());
        memberships.insert("m1", "org-1");
        let scope_builder = builder(&memberships);

        let scope = scope_builder
            .build(&ctx("acct-1", Some("org-1")), Some("m1"))
            .await
            .unwrap();
        assert_eq!(scope, AccessScope::Restricted(vec!["m1".to_string()]));

        let err = scope_builder
            .build(&ctx("acct-1", Some("org-1")), Some("not-a-member"))
            .await
            .unwrap_err();
        assert!(matches!(err, GreenroomError::Forbidden(_)));
    }

    #[tokio::test]
    async fn org_own_id_is_not_a_member() {
        // An organization's own id sits outside its member list unless a
        // membership row explicitly adds it.
        let memberships = Arc::new(InMemoryMemberships::new());
        memberships.insert("m1", "org-1");

        let err = builder(&memberships)
            .build(&ctx("acct-1", Some("org-1")), Some("org-1"))
            .await
            .unwrap_err();
        assert!(matches!(err, GreenroomError::Forbidden(_)));
    }

    #[tokio::test]
    async fn personal_filter_on_other_account_is_forbidden() {
        let memberships = Arc::new(InMemoryMemberships::new());
        let err = builder(&memberships)
            .build(&ctx("acct-1", None), Some("acct-2"))
            .await
            .unwrap_err();
        assert!(matches!(err, GreenroomError::Forbidden(_)));
    }

    #[tokio::test]
    async fn self_filter_narrows_without_lookup() {
        let memberships = Arc::new(InMemoryMemberships::new());
        let scope = builder(&memberships)
            .build(&ctx("acct-1", None), Some("acct-1"))
            .await
            .unwrap();
        assert_eq!(scope, AccessScope::Restricted(vec!["acct-1".to_string()]));
        assert_eq!(memberships.is_member_calls(), 0);
    }

    #[tokio::test]
    async fn undefined_filter_is_absent() {
        let memberships = Arc::new(InMemoryMemberships::new());
        let scope = builder(&memberships)
            .build(&ctx("acct-1", None), Some("undefined"))
            .await
            .unwrap();
        assert_eq!(scope, AccessScope::Restricted(vec!["acct-1".to_string()]));
    }

    #[tokio::test]
    async fn scope_building_is_idempotent() {
        let memberships = Arc::new(InMemoryMemberships::new());
        memberships.insert("m1", "org-1");
        let scope_builder = builder(&memberships);
        let ctx = ctx("acct-1", Some("org-1"));

        let first = scope_builder.build(&ctx, None).await.unwrap();
        let second = scope_builder.build(&ctx, None).await.unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn unrestricted_permits_everything() {
        assert!(AccessScope::Unrestricted.permits(Some("anyone")));
        assert!(AccessScope::Unrestricted.permits(None));
    }

    #[test]
    fn unowned_resources_are_public() {
        let scope = AccessScope::Restricted(vec![]);
        assert!(scope.permits(None));
    }

    #[test]
    fn gate_reports_missing_and_forbidden_identically() {
        let scope = AccessScope::Restricted(vec!["acct-1".to_string()]);

        let missing: Result<&str> = gate_resource(None, |_| None, &scope, "chat", "chat-9");
        let forbidden = gate_resource(
            Some("record"),
            |_| Some("acct-2"),
            &scope,
            "chat",
            "chat-9",
        );

        let missing = missing.unwrap_err().to_string();
        let forbidden = forbidden.unwrap_err().to_string();
        assert_eq!(missing, forbidden);
        assert_eq!(missing, "Not found: chat chat-9");
    }
}
