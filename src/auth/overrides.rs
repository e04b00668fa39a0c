//! Caller-supplied identity overrides.
//!
//! A request body may name an `account_id` and/or `organization_id` the
//! caller wants to act as. Overrides never take effect silently: each one
//! is validated against the membership directory (or the admin bypass)
//! before it replaces the resolved identity.

use crate::auth::credential::ResolvedIdentity;
use crate::error::{GreenroomError, Result};
use crate::organizations::MembershipStore;
use serde::Deserialize;
use std::sync::Arc;

/// Override fields accepted in request bodies.
///
/// Accepts both snake_case and camelCase field names; shape validation
/// happens upstream.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OverrideParams {
    #[serde(default, alias = "accountId")]
    pub account_id: Option<String>,
    #[serde(default, alias = "organizationId")]
    pub organization_id: Option<String>,
}

impl OverrideParams {
    /// Apply [`normalize_override`] to both fields.
    pub fn normalized(self) -> Self {
        Self {
            account_id: normalize_override(self.account_id),
            organization_id: normalize_override(self.organization_id),
        }
    }
}

/// Map degenerate override values to "absent".
///
/// A known upstream-client quirk: the web client serializes missing form
/// state as the literal string `"undefined"`. That and the empty string
/// are normalized away here, ahead of the validators, so authorization
/// logic only ever sees real ids.
pub fn normalize_override(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty() && v != "undefined")
}

/// Validates account and organization overrides against the membership
/// directory. Also used by the scope builder to authorize per-request
/// account filters, so the rules live in exactly one place.
#[derive(Clone)]
pub struct OverrideValidator {
    memberships: Arc<dyn MembershipStore>,
    admin_organization_id: String,
}

impl OverrideValidator {
    pub fn new(memberships: Arc<dyn MembershipStore>, admin_organization_id: impl Into<String>) -> Self {
        Self {
            memberships,
            admin_organization_id: admin_organization_id.into(),
        }
    }

    /// Whether the identity is affiliated with the admin organization.
    ///
    /// An unset admin organization id never matches anything.
    pub fn is_admin(&self, organization_id: Option<&str>) -> bool {
        !self.admin_organization_id.is_empty()
            && organization_id == Some(self.admin_organization_id.as_str())
    }

    /// Authorize an account override.
    ///
    /// Self-access is always allowed without a store call. Admin keys may
    /// act as any account. Organization keys may act as fellow members.
    /// Personal credentials can never act as another account.
    pub async fn account(
        &self,
        identity: &ResolvedIdentity,
        target_account_id: Option<&str>,
    ) -> Result<String> {
        let target = match target_account_id {
            None => return Ok(identity.account_id.clone()),
            Some(target) if target == identity.account_id => {
                return Ok(identity.account_id.clone());
            }
            Some(target) => target,
        };

        if self.is_admin(identity.organization_id.as_deref()) {
            return Ok(target.to_string());
        }

        match identity.organization_id.as_deref() {
            Some(organization_id) => {
                if self.memberships.is_member(target, organization_id).await? {
                    Ok(target.to_string())
                } else {
                    tracing::warn!(
                        account_id = %identity.account_id,
                        target_account_id = %target,
                        organization_id = %organization_id,
                        "account override denied"
                    );
                    Err(GreenroomError::forbidden(
                        "Access denied to specified account_id",
                    ))
                }
            }
            None => {
                tracing::warn!(
                    account_id = %identity.account_id,
                    target_account_id = %target,
                    "account override denied for personal credential"
                );
                Err(GreenroomError::forbidden(
                    "Access denied to specified account_id",
                ))
            }
        }
    }

    /// Authorize an organization override.
    ///
    /// `account_id` must be the identity the caller will actually act as,
    /// i.e. the account override (if any) must already have been applied.
    pub async fn organization(
        &self,
        account_id: &str,
        current_organization_id: Option<String>,
        target_organization_id: Option<&str>,
    ) -> Result<Option<String>> {
        let Some(target) = target_organization_id else {
            return Ok(current_organization_id);
        };

        if self.memberships.is_member(account_id, target).await? {
            Ok(Some(target.to_string()))
        } else {
            tracing::warn!(
                account_id = %account_id,
                target_organization_id = %target,
                "organization override denied"
            );
            Err(GreenroomError::forbidden(
                "Access denied to specified organization_id",
            ))
        }
    }
}
