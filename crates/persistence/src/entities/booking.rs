//! Booking entities (database row mappings).
//!
//! A booking is read as one joined row (booking plus event type columns)
//! and its child rows, which are loaded per page and attached afterwards.

use chrono::{DateTime, Utc};
use domain::models::{
    Attendee, Booking, BookingReference, BookingReport, BookingStatus, EventTypeSummary, Payment,
    PaymentOption, RecurringInfo, SchedulingType,
};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for booking_status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "booking_status", rename_all = "snake_case")]
pub enum BookingStatusDb {
    Accepted,
    Pending,
    Cancelled,
    Rejected,
    AwaitingHost,
}

impl From<BookingStatusDb> for BookingStatus {
    fn from(db: BookingStatusDb) -> Self {
        match db {
            BookingStatusDb::Accepted => Self::Accepted,
            BookingStatusDb::Pending => Self::Pending,
            BookingStatusDb::Cancelled => Self::Cancelled,
            BookingStatusDb::Rejected => Self::Rejected,
            BookingStatusDb::AwaitingHost => Self::AwaitingHost,
        }
    }
}

impl From<BookingStatus> for BookingStatusDb {
    fn from(status: BookingStatus) -> Self {
        match status {
            BookingStatus::Accepted => Self::Accepted,
            BookingStatus::Pending => Self::Pending,
            BookingStatus::Cancelled => Self::Cancelled,
            BookingStatus::Rejected => Self::Rejected,
            BookingStatus::AwaitingHost => Self::AwaitingHost,
        }
    }
}

/// Database enum for scheduling_type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "scheduling_type", rename_all = "snake_case")]
pub enum SchedulingTypeDb {
    RoundRobin,
    Collective,
    Managed,
}

impl From<SchedulingTypeDb> for SchedulingType {
    fn from(db: SchedulingTypeDb) -> Self {
        match db {
            SchedulingTypeDb::RoundRobin => Self::RoundRobin,
            SchedulingTypeDb::Collective => Self::Collective,
            SchedulingTypeDb::Managed => Self::Managed,
        }
    }
}

/// Database enum for payment_option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "payment_option", rename_all = "snake_case")]
pub enum PaymentOptionDb {
    OnBooking,
    Hold,
}

impl From<PaymentOptionDb> for PaymentOption {
    fn from(db: PaymentOptionDb) -> Self {
        match db {
            PaymentOptionDb::OnBooking => Self::OnBooking,
            PaymentOptionDb::Hold => Self::Hold,
        }
    }
}

/// Booking row joined with its event type.
#[derive(Debug, Clone, FromRow)]
pub struct BookingEntity {
    pub id: i64,
    pub uid: String,
    pub title: String,
    pub status: BookingStatusDb,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub recurring_event_id: Option<String>,
    pub location: Option<String>,
    pub paid: bool,
    pub user_id: Option<Uuid>,
    pub from_reschedule: Option<String>,
    pub rescheduled: Option<bool>,
    pub is_recorded: bool,
    pub routed_from_routing_form: bool,
    // Event type columns, all null when the booking has no event type
    pub et_id: Option<i64>,
    pub et_title: Option<String>,
    pub et_team_id: Option<Uuid>,
    pub et_scheduling_type: Option<SchedulingTypeDb>,
    pub et_disable_cancelling: Option<bool>,
    pub et_disable_rescheduling: Option<bool>,
    pub et_seats_per_time_slot: Option<i32>,
    pub et_seats_show_attendees: Option<bool>,
    pub et_allow_reschedule_for_cancelled: Option<bool>,
}

impl BookingEntity {
    fn event_type(&self) -> Option<EventTypeSummary> {
        let id = self.et_id?;
        Some(EventTypeSummary {
            id,
            title: self.et_title.clone().unwrap_or_default(),
            team_id: self.et_team_id,
            scheduling_type: self.et_scheduling_type.map(Into::into),
            disable_cancelling: self.et_disable_cancelling.unwrap_or(false),
            disable_rescheduling: self.et_disable_rescheduling.unwrap_or(false),
            seats_per_time_slot: self.et_seats_per_time_slot,
            seats_show_attendees: self.et_seats_show_attendees.unwrap_or(false),
            allow_reschedule_for_cancelled: self
                .et_allow_reschedule_for_cancelled
                .unwrap_or(false),
        })
    }

    /// Assemble the domain booking from this row and its children.
    pub fn into_booking(self, children: BookingChildren) -> Booking {
        let event_type = self.event_type();
        Booking {
            id: self.id,
            uid: self.uid,
            title: self.title,
            status: self.status.into(),
            start_time: self.start_time,
            end_time: self.end_time,
            recurring_event_id: self.recurring_event_id,
            location: self.location,
            paid: self.paid,
            user_id: self.user_id,
            from_reschedule: self.from_reschedule,
            rescheduled: self.rescheduled,
            is_recorded: self.is_recorded,
            routed_from_routing_form: self.routed_from_routing_form,
            event_type,
            attendees: children.attendees,
            payments: children.payments,
            references: children.references,
            report: children.report,
        }
    }
}

/// Child rows of one booking, already converted to domain values.
#[derive(Debug, Clone, Default)]
pub struct BookingChildren {
    pub attendees: Vec<Attendee>,
    pub payments: Vec<Payment>,
    pub references: Vec<BookingReference>,
    pub report: Option<BookingReport>,
}

/// Database row mapping for the attendees table.
#[derive(Debug, Clone, FromRow)]
pub struct AttendeeEntity {
    pub id: i64,
    pub booking_id: i64,
    pub email: String,
    pub name: String,
    pub time_zone: String,
    pub no_show: bool,
}

impl From<AttendeeEntity> for Attendee {
    fn from(entity: AttendeeEntity) -> Self {
        Self {
            id: entity.id,
            email: entity.email,
            name: entity.name,
            time_zone: entity.time_zone,
            no_show: entity.no_show,
        }
    }
}

/// Database row mapping for the payments table.
#[derive(Debug, Clone, FromRow)]
pub struct PaymentEntity {
    pub id: i64,
    pub booking_id: i64,
    pub amount: i64,
    pub currency: String,
    pub success: bool,
    pub refunded: bool,
    pub payment_option: PaymentOptionDb,
}

impl From<PaymentEntity> for Payment {
    fn from(entity: PaymentEntity) -> Self {
        Self {
            id: entity.id,
            amount: entity.amount,
            currency: entity.currency,
            success: entity.success,
            refunded: entity.refunded,
            payment_option: entity.payment_option.into(),
        }
    }
}

/// Database row mapping for the booking_references table.
#[derive(Debug, Clone, FromRow)]
pub struct BookingReferenceEntity {
    pub booking_id: i64,
    pub kind: String,
    pub uid: String,
    pub meeting_url: Option<String>,
}

impl From<BookingReferenceEntity> for BookingReference {
    fn from(entity: BookingReferenceEntity) -> Self {
        Self {
            kind: entity.kind,
            uid: entity.uid,
            meeting_url: entity.meeting_url,
        }
    }
}

/// Database row mapping for the booking_reports table.
#[derive(Debug, Clone, FromRow)]
pub struct BookingReportEntity {
    pub booking_id: i64,
    pub reason: String,
    pub reported_at: DateTime<Utc>,
}

impl From<BookingReportEntity> for BookingReport {
    fn from(entity: BookingReportEntity) -> Self {
        Self {
            reason: entity.reason,
            reported_at: entity.reported_at,
        }
    }
}

/// Aggregate of one recurring series.
#[derive(Debug, Clone, FromRow)]
pub struct RecurringInfoEntity {
    pub recurring_event_id: String,
    pub count: i64,
    pub first_date: Option<DateTime<Utc>>,
    pub booking_ids: Vec<i64>,
}

impl From<RecurringInfoEntity> for RecurringInfo {
    fn from(entity: RecurringInfoEntity) -> Self {
        Self {
            recurring_event_id: entity.recurring_event_id,
            count: entity.count,
            first_date: entity.first_date,
            booking_ids: entity.booking_ids,
        }
    }
}
