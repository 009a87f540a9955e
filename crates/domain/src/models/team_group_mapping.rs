//! Directory-sync team group mapping models.
//!
//! A mapping links a directory group name to a team inside an organization so
//! that directory members of that group are provisioned into the team.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Team group mapping domain model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TeamGroupMapping {
    pub id: i64,
    pub organization_id: Uuid,
    pub team_id: Uuid,
    pub directory_id: String,
    pub group_name: String,
    pub created_at: DateTime<Utc>,
}

/// Request to create a team group mapping.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateTeamGroupMappingRequest {
    pub team_id: Uuid,
    #[validate(length(min = 1, max = 255, message = "Directory id must be 1-255 characters"))]
    pub directory_id: String,
    #[validate(length(min = 1, max = 255, message = "Group name must be 1-255 characters"))]
    pub group_name: String,
}

/// Response listing the mappings of an organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ListTeamGroupMappingsResponse {
    pub data: Vec<TeamGroupMapping>,
}
