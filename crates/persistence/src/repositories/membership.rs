//! Membership repository for database operations.

use async_trait::async_trait;
use domain::models::Membership;
use domain::services::{AccessDecision, MembershipStore, OrganizationAccessCheck, StoreError};
use sqlx::PgPool;
use uuid::Uuid;

use super::store_error;
use crate::entities::MembershipEntity;
use crate::metrics::QueryTimer;

/// Message returned when a user may not manage an organization.
pub const ORGANIZATION_ACCESS_DENIED: &str = "You do not have access to this organization";

/// Repository for team membership database operations.
#[derive(Clone)]
pub struct MembershipRepository {
    pool: PgPool,
}

impl MembershipRepository {
    /// Creates a new MembershipRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find the accepted owner/admin membership a user holds in an organization team.
    pub async fn find_admin_membership(
        &self,
        user_id: Uuid,
    ) -> Result<Option<MembershipEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_organization_admin_membership");
        let result = sqlx::query_as::<_, MembershipEntity>(
            r#"
            SELECT m.id, m.user_id, m.team_id, m.role, m.accepted
            FROM memberships m
            JOIN teams t ON t.id = m.team_id
            WHERE m.user_id = $1
              AND m.accepted
              AND m.role IN ('owner', 'admin')
              AND t.is_organization
            ORDER BY m.id
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List accepted member ids of a team, optionally restricted to the given users.
    pub async fn accepted_member_ids(
        &self,
        team_id: Uuid,
        user_ids: Option<&[Uuid]>,
    ) -> Result<Vec<Uuid>, sqlx::Error> {
        let timer = QueryTimer::new("find_accepted_member_ids");
        let result = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT DISTINCT user_id
            FROM memberships
            WHERE team_id = $1
              AND accepted
              AND ($2::uuid[] IS NULL OR user_id = ANY($2))
            ORDER BY user_id
            "#,
        )
        .bind(team_id)
        .bind(user_ids.map(|ids| ids.to_vec()))
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Check whether a user holds an accepted owner/admin membership in the given organization.
    pub async fn is_organization_admin(
        &self,
        user_id: Uuid,
        organization_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("is_organization_admin");
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM memberships m
                JOIN teams t ON t.id = m.team_id
                WHERE m.user_id = $1
                  AND m.team_id = $2
                  AND m.accepted
                  AND m.role IN ('owner', 'admin')
                  AND t.is_organization
            )
            "#,
        )
        .bind(user_id)
        .bind(organization_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}

#[async_trait]
impl MembershipStore for MembershipRepository {
    async fn find_organization_admin_membership(
        &self,
        user_id: Uuid,
    ) -> Result<Option<Membership>, StoreError> {
        self.find_admin_membership(user_id)
            .await
            .map(|entity| entity.map(Into::into))
            .map_err(store_error)
    }

    async fn find_accepted_member_ids(
        &self,
        team_id: Uuid,
        user_ids: Option<&[Uuid]>,
    ) -> Result<Vec<Uuid>, StoreError> {
        self.accepted_member_ids(team_id, user_ids)
            .await
            .map_err(store_error)
    }
}

#[async_trait]
impl OrganizationAccessCheck for MembershipRepository {
    async fn check(
        &self,
        user_id: Uuid,
        organization_id: Uuid,
    ) -> Result<AccessDecision, StoreError> {
        let is_admin = self
            .is_organization_admin(user_id, organization_id)
            .await
            .map_err(store_error)?;

        Ok(if is_admin {
            AccessDecision::Granted
        } else {
            AccessDecision::Denied(ORGANIZATION_ACCESS_DENIED.to_string())
        })
    }
}
