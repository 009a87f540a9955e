//! Domain services for the bookings backend.
//!
//! Services contain business logic that operates on domain models.

pub mod accessible_users;
pub mod booking_actions;
pub mod booking_list;
pub mod booking_mutations;
pub mod booking_rows;
pub mod team_group_mapping;

use thiserror::Error;

/// Error raised by a backing store behind one of the service traits.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Store query failed: {0}")]
    Query(String),
}

pub use accessible_users::{
    resolve_accessible_users, resolve_all_organization_members, MembershipStore,
};

pub use booking_rows::{
    build_rows, build_rows_with_recurring_info, DataRow, MonthKey, Row, SectionLabel,
    SeriesSummary,
};

pub use booking_actions::{
    available_actions, derive_flags, dispatch, ActionContext, ActionGroups, ActionId,
    BookingAction, BookingFlags, Dialog, Dispatch, MutationKind,
};

pub use booking_list::{
    mutation_error_message, BookingListState, BookingNavigator, MutationError, Notice, NoticeKind,
    GENERIC_MUTATION_ERROR,
};

pub use booking_mutations::{check_location_edit, check_no_show, BookingPermission};

pub use team_group_mapping::{
    authorize, AccessDecision, AuthorizedMapping, GuardError, OrganizationAccessCheck, TeamStore,
};
