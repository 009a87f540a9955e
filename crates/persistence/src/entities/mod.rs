//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod booking;
pub mod membership;
pub mod team;
pub mod team_group_mapping;

pub use booking::{
    AttendeeEntity, BookingChildren, BookingEntity, BookingReferenceEntity, BookingReportEntity,
    BookingStatusDb, PaymentEntity, PaymentOptionDb, RecurringInfoEntity, SchedulingTypeDb,
};
pub use membership::{MembershipEntity, MembershipRoleDb};
pub use team::TeamEntity;
pub use team_group_mapping::TeamGroupMappingEntity;
