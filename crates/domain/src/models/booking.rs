//! Booking domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Location value used by the built-in video conferencing integration.
pub const CAL_VIDEO_LOCATION: &str = "integrations:daily";

/// Reference kind recorded for built-in video conferencing rooms.
pub const CAL_VIDEO_REFERENCE: &str = "daily_video";

/// Lifecycle status of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Accepted,
    Pending,
    Cancelled,
    Rejected,
    AwaitingHost,
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookingStatus::Accepted => write!(f, "accepted"),
            BookingStatus::Pending => write!(f, "pending"),
            BookingStatus::Cancelled => write!(f, "cancelled"),
            BookingStatus::Rejected => write!(f, "rejected"),
            BookingStatus::AwaitingHost => write!(f, "awaiting_host"),
        }
    }
}

/// The tab a booking list is being viewed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BookingListStatus {
    #[default]
    Upcoming,
    Recurring,
    Past,
    Cancelled,
    Unconfirmed,
}

impl BookingListStatus {
    /// Whether recurring series collapse to their first occurrence under this tab.
    pub fn collapses_recurring(&self) -> bool {
        matches!(
            self,
            BookingListStatus::Recurring | BookingListStatus::Unconfirmed | BookingListStatus::Cancelled
        )
    }

    /// Whether the tab lists the oldest bookings first.
    pub fn sorts_ascending(&self) -> bool {
        !matches!(self, BookingListStatus::Past | BookingListStatus::Cancelled)
    }
}

impl FromStr for BookingListStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "upcoming" => Ok(BookingListStatus::Upcoming),
            "recurring" => Ok(BookingListStatus::Recurring),
            "past" => Ok(BookingListStatus::Past),
            "cancelled" => Ok(BookingListStatus::Cancelled),
            "unconfirmed" => Ok(BookingListStatus::Unconfirmed),
            _ => Err(format!("Unknown booking status filter: {}", s)),
        }
    }
}

impl std::fmt::Display for BookingListStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookingListStatus::Upcoming => write!(f, "upcoming"),
            BookingListStatus::Recurring => write!(f, "recurring"),
            BookingListStatus::Past => write!(f, "past"),
            BookingListStatus::Cancelled => write!(f, "cancelled"),
            BookingListStatus::Unconfirmed => write!(f, "unconfirmed"),
        }
    }
}

/// How hosts are assigned for a team event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulingType {
    RoundRobin,
    Collective,
    Managed,
}

/// Event type fields the booking list needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub struct EventTypeSummary {
    pub id: i64,
    pub title: String,
    pub team_id: Option<Uuid>,
    pub scheduling_type: Option<SchedulingType>,
    pub disable_cancelling: bool,
    pub disable_rescheduling: bool,
    pub seats_per_time_slot: Option<i32>,
    pub seats_show_attendees: bool,
    pub allow_reschedule_for_cancelled: bool,
}

/// A booking attendee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Attendee {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub time_zone: String,
    pub no_show: bool,
}

/// When a payment is captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentOption {
    OnBooking,
    Hold,
}

/// A payment record attached to a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Payment {
    pub id: i64,
    pub amount: i64,
    pub currency: String,
    pub success: bool,
    pub refunded: bool,
    pub payment_option: PaymentOption,
}

/// A reference to a provider-side resource (video room, calendar event).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BookingReference {
    pub kind: String,
    pub uid: String,
    pub meeting_url: Option<String>,
}

/// A report filed against a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BookingReport {
    pub reason: String,
    pub reported_at: DateTime<Utc>,
}

/// Booking domain model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Booking {
    pub id: i64,
    pub uid: String,
    pub title: String,
    pub status: BookingStatus,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub recurring_event_id: Option<String>,
    pub location: Option<String>,
    pub paid: bool,
    /// Organizer.
    pub user_id: Option<Uuid>,
    pub from_reschedule: Option<String>,
    pub rescheduled: Option<bool>,
    pub is_recorded: bool,
    pub routed_from_routing_form: bool,
    pub event_type: Option<EventTypeSummary>,
    pub attendees: Vec<Attendee>,
    pub payments: Vec<Payment>,
    pub references: Vec<BookingReference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<BookingReport>,
}

impl Booking {
    /// Whether this booking is one occurrence of a recurring series.
    pub fn is_recurring(&self) -> bool {
        self.recurring_event_id.is_some()
    }

    /// Whether the meeting runs on the built-in video integration.
    pub fn uses_cal_video(&self) -> bool {
        self.location.as_deref() == Some(CAL_VIDEO_LOCATION)
            || self.references.iter().any(|r| r.kind == CAL_VIDEO_REFERENCE)
    }

    /// Whether the given email belongs to one of the attendees.
    pub fn has_attendee(&self, email: &str) -> bool {
        self.attendees
            .iter()
            .any(|a| a.email.eq_ignore_ascii_case(email))
    }
}

/// Summary of a recurring series returned alongside a booking page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RecurringInfo {
    pub recurring_event_id: String,
    /// Number of bookings in the series that match the current filters.
    pub count: i64,
    pub first_date: Option<DateTime<Utc>>,
    pub booking_ids: Vec<i64>,
}

/// Typed filters for the booking query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingFilters {
    pub status: BookingListStatus,
    pub event_type_ids: Vec<i64>,
    pub team_ids: Vec<Uuid>,
    pub user_ids: Vec<Uuid>,
    pub attendee_name: Option<String>,
    pub attendee_email: Option<String>,
    pub booking_uid: Option<String>,
    pub after_start_date: Option<DateTime<Utc>>,
    pub before_end_date: Option<DateTime<Utc>>,
}

/// Paginated booking query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingQuery {
    pub limit: i64,
    pub offset: i64,
    pub filters: BookingFilters,
}

/// One page of bookings as returned by the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BookingPage {
    pub bookings: Vec<Booking>,
    pub recurring_info: Vec<RecurringInfo>,
    pub total_count: i64,
}

/// Raw query parameters for listing bookings.
///
/// Id lists are comma-separated.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub struct ListBookingsQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub status: Option<BookingListStatus>,
    pub event_type_ids: Option<String>,
    pub team_ids: Option<String>,
    pub user_ids: Option<String>,
    pub attendee_name: Option<String>,
    pub attendee_email: Option<String>,
    pub booking_uid: Option<String>,
    pub after_start_date: Option<DateTime<Utc>>,
    pub before_end_date: Option<DateTime<Utc>>,
    /// UTC offset used for grouping, e.g. `+02:00`. Defaults to UTC.
    pub time_zone: Option<String>,
}

/// A single attendee no-show update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct NoShowAttendee {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    pub no_show: bool,
}

/// Request to mark attendees of a booking as no-show.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct MarkNoShowRequest {
    #[validate(length(min = 1, message = "At least one attendee is required"), nested)]
    pub attendees: Vec<NoShowAttendee>,
}

/// Response for a no-show update.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MarkNoShowResponse {
    pub booking_uid: String,
    pub attendees: Vec<NoShowAttendee>,
    pub message: String,
}

/// Request to change the location of a booking.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct EditLocationRequest {
    #[validate(length(min = 1, max = 2048, message = "Location must be 1-2048 characters"))]
    pub new_location: String,
    pub credential_id: Option<i64>,
}

/// Response for a location change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EditLocationResponse {
    pub booking_id: i64,
    pub location: String,
    pub message: String,
}
