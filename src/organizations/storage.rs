//! Membership storage trait.

use crate::error::Result;
use async_trait::async_trait;

/// Read-only view of the account/organization membership relation.
///
/// Implement this trait for your database layer. The authorization engine
/// issues these queries during override validation and scope construction;
/// it never writes membership rows.
///
/// # Example
///
/// ```rust,ignore
/// use greenroom::organizations::MembershipStore;
/// use async_trait::async_trait;
///
/// struct PgMembershipStore { pool: PgPool }
///
/// #[async_trait]
/// impl MembershipStore for PgMembershipStore {
///     async fn is_member(&self, account_id: &str, organization_id: &str) -> Result<bool> {
///         // SELECT EXISTS(...)
///     }
///
///     async fn list_member_ids(&self, organization_id: &str) -> Result<Vec<String>> {
///         // SELECT account_id FROM memberships WHERE organization_id = $1
///     }
/// }
/// ```
#[async_trait]
pub trait MembershipStore: Send + Sync {
    /// Whether the account belongs to the organization.
    ///
    /// An organization's own id is not an implicit member; only explicit
    /// membership rows count.
    async fn is_member(&self, account_id: &str, organization_id: &str) -> Result<bool>;

    /// All member account ids of the organization. May legitimately be
    /// empty.
    async fn list_member_ids(&self, organization_id: &str) -> Result<Vec<String>>;
}
