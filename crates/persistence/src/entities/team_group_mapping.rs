//! Team group mapping entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the team_group_mappings table.
#[derive(Debug, Clone, FromRow)]
pub struct TeamGroupMappingEntity {
    pub id: i64,
    pub organization_id: Uuid,
    pub team_id: Uuid,
    pub directory_id: String,
    pub group_name: String,
    pub created_at: DateTime<Utc>,
}

impl From<TeamGroupMappingEntity> for domain::models::TeamGroupMapping {
    fn from(entity: TeamGroupMappingEntity) -> Self {
        Self {
            id: entity.id,
            organization_id: entity.organization_id,
            team_id: entity.team_id,
            directory_id: entity.directory_id,
            group_name: entity.group_name,
            created_at: entity.created_at,
        }
    }
}
