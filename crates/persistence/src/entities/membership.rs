//! Membership entity (database row mapping).

use domain::models::{Membership, MembershipRole};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for membership_role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "membership_role", rename_all = "lowercase")]
pub enum MembershipRoleDb {
    Owner,
    Admin,
    Member,
}

impl From<MembershipRoleDb> for MembershipRole {
    fn from(db: MembershipRoleDb) -> Self {
        match db {
            MembershipRoleDb::Owner => Self::Owner,
            MembershipRoleDb::Admin => Self::Admin,
            MembershipRoleDb::Member => Self::Member,
        }
    }
}

impl From<MembershipRole> for MembershipRoleDb {
    fn from(role: MembershipRole) -> Self {
        match role {
            MembershipRole::Owner => Self::Owner,
            MembershipRole::Admin => Self::Admin,
            MembershipRole::Member => Self::Member,
        }
    }
}

/// Database row mapping for the memberships table.
#[derive(Debug, Clone, FromRow)]
pub struct MembershipEntity {
    pub id: i64,
    pub user_id: Uuid,
    pub team_id: Uuid,
    pub role: MembershipRoleDb,
    pub accepted: bool,
}

impl From<MembershipEntity> for Membership {
    fn from(entity: MembershipEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            team_id: entity.team_id,
            role: entity.role.into(),
            accepted: entity.accepted,
        }
    }
}
