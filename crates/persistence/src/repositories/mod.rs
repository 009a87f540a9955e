//! Repository implementations for database operations.

pub mod booking;
pub mod membership;
pub mod team;
pub mod team_group_mapping;
pub mod user;

pub use booking::{BookingRepository, BookingVisibility};
pub use membership::{MembershipRepository, ORGANIZATION_ACCESS_DENIED};
pub use team::TeamRepository;
pub use team_group_mapping::TeamGroupMappingRepository;
pub use user::UserRepository;

use domain::services::StoreError;

/// Convert a database error into the store error the domain traits return.
pub(crate) fn store_error(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            StoreError::Unavailable(err.to_string())
        }
        other => StoreError::Query(other.to_string()),
    }
}
