//! Accessible users resolution for organization admins.
//!
//! An admin may act on a user only when the admin holds an accepted owner or
//! admin membership in an organization and the user holds an accepted
//! membership in that same organization.
//!
//! Both resolvers apply the same policy to the admin's own membership: it has
//! to be accepted. A pending invitation to administer an organization grants
//! nothing.

use std::collections::BTreeSet;

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use super::StoreError;
use crate::models::Membership;

/// Read access to team memberships.
#[async_trait]
pub trait MembershipStore: Send + Sync {
    /// Find the accepted owner/admin membership the user holds in a team
    /// flagged as an organization.
    async fn find_organization_admin_membership(
        &self,
        user_id: Uuid,
    ) -> Result<Option<Membership>, StoreError>;

    /// List user ids with an accepted membership in the team.
    ///
    /// When `user_ids` is given, only those users are considered.
    async fn find_accepted_member_ids(
        &self,
        team_id: Uuid,
        user_ids: Option<&[Uuid]>,
    ) -> Result<Vec<Uuid>, StoreError>;
}

/// Look up the organization the admin administers, if any.
async fn administered_organization<S>(store: &S, admin_id: Uuid) -> Result<Option<Uuid>, StoreError>
where
    S: MembershipStore + ?Sized,
{
    let membership = store.find_organization_admin_membership(admin_id).await?;

    Ok(membership
        .filter(Membership::grants_admin_scope)
        .map(|m| m.team_id))
}

/// Resolve which of the candidate users the admin may act on.
///
/// Returns an empty list when the admin administers no organization. An empty
/// result is therefore ambiguous between "no scope" and "no matches".
/// The result is deduplicated and sorted; input order is not preserved.
pub async fn resolve_accessible_users<S>(
    store: &S,
    admin_id: Uuid,
    candidate_ids: &[Uuid],
) -> Result<Vec<Uuid>, StoreError>
where
    S: MembershipStore + ?Sized,
{
    let Some(organization_id) = administered_organization(store, admin_id).await? else {
        debug!(admin_id = %admin_id, "User administers no organization");
        return Ok(Vec::new());
    };

    if candidate_ids.is_empty() {
        return Ok(Vec::new());
    }

    let candidates: Vec<Uuid> = candidate_ids
        .iter()
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let members = store
        .find_accepted_member_ids(organization_id, Some(&candidates))
        .await?;

    // Guard against stores that ignore the candidate filter.
    let allowed: BTreeSet<Uuid> = members
        .into_iter()
        .filter(|id| candidates.binary_search(id).is_ok())
        .collect();

    Ok(allowed.into_iter().collect())
}

/// Resolve every accepted member of the organization the admin administers.
pub async fn resolve_all_organization_members<S>(
    store: &S,
    admin_id: Uuid,
) -> Result<Vec<Uuid>, StoreError>
where
    S: MembershipStore + ?Sized,
{
    let Some(organization_id) = administered_organization(store, admin_id).await? else {
        debug!(admin_id = %admin_id, "User administers no organization");
        return Ok(Vec::new());
    };

    let members = store.find_accepted_member_ids(organization_id, None).await?;

    Ok(members
        .into_iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect())
}
