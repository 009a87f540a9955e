//! Team and organization domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A team. Organizations are teams flagged with `is_organization`;
/// sub-teams point at their organization through `parent_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Team {
    pub id: Uuid,
    pub name: String,
    pub slug: Option<String>,
    pub parent_id: Option<Uuid>,
    pub is_organization: bool,
    pub created_at: DateTime<Utc>,
}

impl Team {
    /// Whether this team sits directly under the given organization.
    pub fn belongs_to(&self, organization_id: Uuid) -> bool {
        self.parent_id == Some(organization_id)
    }
}
