//! Authorization guard for team group mapping operations.
//!
//! Before a directory group can be mapped onto a team, the caller needs
//! access to the organization and the team has to sit directly under it.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use super::StoreError;
use crate::models::Team;

/// Outcome of an organization access check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    Granted,
    Denied(String),
}

/// Decides whether a user may manage an organization.
#[async_trait]
pub trait OrganizationAccessCheck: Send + Sync {
    async fn check(&self, user_id: Uuid, organization_id: Uuid)
        -> Result<AccessDecision, StoreError>;
}

/// Read access to teams.
#[async_trait]
pub trait TeamStore: Send + Sync {
    /// Find a team by id whose parent is the given organization.
    async fn find_team_in_organization(
        &self,
        team_id: Uuid,
        organization_id: Uuid,
    ) -> Result<Option<Team>, StoreError>;
}

/// Errors raised by the guard.
#[derive(Debug, Error)]
pub enum GuardError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl GuardError {
    /// HTTP status code this error maps to.
    pub fn status_code(&self) -> u16 {
        match self {
            GuardError::BadRequest(_) => 400,
            GuardError::Store(_) => 500,
        }
    }
}

/// A mapping operation that passed the guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthorizedMapping {
    pub organization_id: Uuid,
}

/// Authorize a team group mapping operation.
///
/// Fails with [`GuardError::BadRequest`] when the organization id is missing,
/// when access is denied, or when `team_id` is given but that team is not a
/// direct child of the organization.
pub async fn authorize<A, T>(
    access: &A,
    teams: &T,
    user_id: Uuid,
    organization_id: Option<Uuid>,
    team_id: Option<Uuid>,
) -> Result<AuthorizedMapping, GuardError>
where
    A: OrganizationAccessCheck + ?Sized,
    T: TeamStore + ?Sized,
{
    let organization_id = organization_id
        .ok_or_else(|| GuardError::BadRequest("organizationId is required".to_string()))?;

    if let AccessDecision::Denied(message) = access.check(user_id, organization_id).await? {
        return Err(GuardError::BadRequest(message));
    }

    if let Some(team_id) = team_id {
        let team = teams
            .find_team_in_organization(team_id, organization_id)
            .await?;

        // The team must be a direct child of the organization.
        if !team.is_some_and(|t| t.id == team_id && t.belongs_to(organization_id)) {
            return Err(GuardError::BadRequest(
                "Team not found in organization".to_string(),
            ));
        }
    }

    Ok(AuthorizedMapping { organization_id })
}
