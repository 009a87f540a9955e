//! Domain models for the bookings backend.

pub mod booking;
pub mod membership;
pub mod team;
pub mod team_group_mapping;

pub use booking::{
    Attendee, Booking, BookingFilters, BookingListStatus, BookingPage, BookingQuery,
    BookingReference, BookingReport, BookingStatus, EditLocationRequest, EditLocationResponse,
    EventTypeSummary, ListBookingsQuery, MarkNoShowRequest, MarkNoShowResponse, NoShowAttendee,
    Payment, PaymentOption, RecurringInfo, SchedulingType,
};
pub use membership::{AccessibleUsersQuery, AccessibleUsersResponse, Membership, MembershipRole};
pub use team::Team;
pub use team_group_mapping::{
    CreateTeamGroupMappingRequest, ListTeamGroupMappingsResponse, TeamGroupMapping,
};
