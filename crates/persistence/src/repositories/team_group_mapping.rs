//! Team group mapping repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::TeamGroupMappingEntity;
use crate::metrics::QueryTimer;

/// Repository for directory group to team mappings.
#[derive(Clone)]
pub struct TeamGroupMappingRepository {
    pool: PgPool,
}

impl TeamGroupMappingRepository {
    /// Creates a new TeamGroupMappingRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a mapping. Fails with a unique violation when the team already
    /// maps the same group name.
    pub async fn create(
        &self,
        organization_id: Uuid,
        team_id: Uuid,
        directory_id: &str,
        group_name: &str,
    ) -> Result<TeamGroupMappingEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_team_group_mapping");
        let result = sqlx::query_as::<_, TeamGroupMappingEntity>(
            r#"
            INSERT INTO team_group_mappings (organization_id, team_id, directory_id, group_name)
            VALUES ($1, $2, $3, $4)
            RETURNING id, organization_id, team_id, directory_id, group_name, created_at
            "#,
        )
        .bind(organization_id)
        .bind(team_id)
        .bind(directory_id)
        .bind(group_name)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List the mappings of an organization.
    pub async fn list_by_organization(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<TeamGroupMappingEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_team_group_mappings");
        let result = sqlx::query_as::<_, TeamGroupMappingEntity>(
            r#"
            SELECT id, organization_id, team_id, directory_id, group_name, created_at
            FROM team_group_mappings
            WHERE organization_id = $1
            ORDER BY team_id, group_name
            "#,
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a mapping of an organization by ID.
    pub async fn find_by_id(
        &self,
        organization_id: Uuid,
        id: i64,
    ) -> Result<Option<TeamGroupMappingEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_team_group_mapping");
        let result = sqlx::query_as::<_, TeamGroupMappingEntity>(
            r#"
            SELECT id, organization_id, team_id, directory_id, group_name, created_at
            FROM team_group_mappings
            WHERE organization_id = $1 AND id = $2
            "#,
        )
        .bind(organization_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a mapping. Returns whether a row was removed.
    pub async fn delete(&self, organization_id: Uuid, id: i64) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_team_group_mapping");
        let result = sqlx::query(
            r#"
            DELETE FROM team_group_mappings
            WHERE organization_id = $1 AND id = $2
            "#,
        )
        .bind(organization_id)
        .bind(id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected() > 0)
    }
}
