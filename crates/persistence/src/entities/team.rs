//! Team entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the teams table.
#[derive(Debug, Clone, FromRow)]
pub struct TeamEntity {
    pub id: Uuid,
    pub name: String,
    pub slug: Option<String>,
    pub parent_id: Option<Uuid>,
    pub is_organization: bool,
    pub created_at: DateTime<Utc>,
}

impl From<TeamEntity> for domain::models::Team {
    fn from(entity: TeamEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            slug: entity.slug,
            parent_id: entity.parent_id,
            is_organization: entity.is_organization,
            created_at: entity.created_at,
        }
    }
}
