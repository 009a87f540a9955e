//! Team membership domain models.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Roles a user can hold within a team or organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipRole {
    Owner,
    Admin,
    Member,
}

impl MembershipRole {
    /// Roles that grant administrative scope over an organization.
    pub const ADMINISTRATIVE: [MembershipRole; 2] = [MembershipRole::Owner, MembershipRole::Admin];

    /// Check if this role has at least the specified role level.
    pub fn has_at_least(&self, required: MembershipRole) -> bool {
        match (self, required) {
            (MembershipRole::Owner, _) => true,
            (MembershipRole::Admin, MembershipRole::Member) => true,
            (MembershipRole::Admin, MembershipRole::Admin) => true,
            (MembershipRole::Admin, MembershipRole::Owner) => false,
            (MembershipRole::Member, MembershipRole::Member) => true,
            (MembershipRole::Member, _) => false,
        }
    }

    /// Whether this role administers the team it belongs to.
    pub fn is_administrative(&self) -> bool {
        self.has_at_least(MembershipRole::Admin)
    }
}

impl FromStr for MembershipRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "owner" => Ok(MembershipRole::Owner),
            "admin" => Ok(MembershipRole::Admin),
            "member" => Ok(MembershipRole::Member),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

impl std::fmt::Display for MembershipRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MembershipRole::Owner => write!(f, "owner"),
            MembershipRole::Admin => write!(f, "admin"),
            MembershipRole::Member => write!(f, "member"),
        }
    }
}

/// A user's membership in a team.
///
/// A membership only takes effect once `accepted` is true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Membership {
    pub id: i64,
    pub user_id: Uuid,
    pub team_id: Uuid,
    pub role: MembershipRole,
    pub accepted: bool,
}

impl Membership {
    /// Whether the membership is in effect.
    pub fn is_effective(&self) -> bool {
        self.accepted
    }

    /// Whether this membership grants administrative scope over its team.
    pub fn grants_admin_scope(&self) -> bool {
        self.accepted && self.role.is_administrative()
    }
}

/// Query parameters for resolving accessible users.
///
/// `user_ids` is a comma-separated list of user ids.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub struct AccessibleUsersQuery {
    #[serde(default)]
    pub user_ids: Option<String>,
}

/// Response listing user ids the caller may act on.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AccessibleUsersResponse {
    pub user_ids: Vec<Uuid>,
}
