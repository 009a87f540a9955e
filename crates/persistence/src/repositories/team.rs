//! Team repository for database operations.

use async_trait::async_trait;
use domain::models::Team;
use domain::services::{StoreError, TeamStore};
use sqlx::PgPool;
use uuid::Uuid;

use super::store_error;
use crate::entities::TeamEntity;
use crate::metrics::QueryTimer;

/// Repository for team database operations.
#[derive(Clone)]
pub struct TeamRepository {
    pool: PgPool,
}

impl TeamRepository {
    /// Creates a new TeamRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a team by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<TeamEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_team_by_id");
        let result = sqlx::query_as::<_, TeamEntity>(
            r#"
            SELECT id, name, slug, parent_id, is_organization, created_at
            FROM teams
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a team by ID whose parent is the given organization.
    pub async fn find_child(
        &self,
        team_id: Uuid,
        organization_id: Uuid,
    ) -> Result<Option<TeamEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_team_in_organization");
        let result = sqlx::query_as::<_, TeamEntity>(
            r#"
            SELECT id, name, slug, parent_id, is_organization, created_at
            FROM teams
            WHERE id = $1 AND parent_id = $2
            "#,
        )
        .bind(team_id)
        .bind(organization_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }
}

#[async_trait]
impl TeamStore for TeamRepository {
    async fn find_team_in_organization(
        &self,
        team_id: Uuid,
        organization_id: Uuid,
    ) -> Result<Option<Team>, StoreError> {
        self.find_child(team_id, organization_id)
            .await
            .map(|entity| entity.map(Into::into))
            .map_err(store_error)
    }
}
