//! Booking repository for database operations.
//!
//! Listing runs one filtered page query, one count query and one query per
//! child table for the bookings on the page. Recurring series on the page get
//! an aggregate row each.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use domain::models::{Booking, BookingPage, BookingQuery, NoShowAttendee};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{
    AttendeeEntity, BookingChildren, BookingEntity, BookingReferenceEntity, BookingReportEntity,
    PaymentEntity, RecurringInfoEntity,
};
use crate::metrics::QueryTimer;

const BOOKING_COLUMNS: &str = r#"
    b.id, b.uid, b.title, b.status, b.start_time, b.end_time, b.recurring_event_id,
    b.location, b.paid, b.user_id, b.from_reschedule, b.rescheduled, b.is_recorded,
    b.routed_from_routing_form,
    et.id AS et_id, et.title AS et_title, et.team_id AS et_team_id,
    et.scheduling_type AS et_scheduling_type,
    et.disable_cancelling AS et_disable_cancelling,
    et.disable_rescheduling AS et_disable_rescheduling,
    et.seats_per_time_slot AS et_seats_per_time_slot,
    et.seats_show_attendees AS et_seats_show_attendees,
    et.allow_reschedule_for_cancelled AS et_allow_reschedule_for_cancelled
"#;

const BOOKING_FROM: &str = "bookings b LEFT JOIN event_types et ON et.id = b.event_type_id";

/// SQL condition selecting bookings of a list status.
///
/// `status` and `now` are the placeholders of a text and a timestamptz parameter.
fn status_condition(status: &str, now: &str) -> String {
    format!(
        r#"
        CASE {status}::text
            WHEN 'upcoming' THEN b.end_time >= {now}::timestamptz
                AND b.status NOT IN ('cancelled', 'rejected')
            WHEN 'recurring' THEN b.end_time >= {now}::timestamptz
                AND b.status NOT IN ('cancelled', 'rejected')
                AND b.recurring_event_id IS NOT NULL
            WHEN 'past' THEN b.end_time <= {now}::timestamptz
                AND b.status NOT IN ('cancelled', 'rejected')
            WHEN 'cancelled' THEN b.status IN ('cancelled', 'rejected')
            WHEN 'unconfirmed' THEN b.end_time >= {now}::timestamptz
                AND b.status = 'pending'
            ELSE FALSE
        END
        "#
    )
}

/// Filter shared by the page and count queries ($1 to $12).
fn list_filter() -> String {
    format!(
        r#"
        (b.user_id = ANY($1)
            OR ($2::text IS NOT NULL AND EXISTS (
                SELECT 1 FROM attendees va
                WHERE va.booking_id = b.id AND LOWER(va.email) = LOWER($2))))
        AND {status}
        AND (cardinality($5::bigint[]) = 0 OR b.event_type_id = ANY($5))
        AND (cardinality($6::uuid[]) = 0 OR et.team_id = ANY($6))
        AND (cardinality($7::uuid[]) = 0 OR b.user_id = ANY($7))
        AND ($8::text IS NULL OR EXISTS (
            SELECT 1 FROM attendees fa
            WHERE fa.booking_id = b.id AND fa.name ILIKE '%' || $8 || '%'))
        AND ($9::text IS NULL OR EXISTS (
            SELECT 1 FROM attendees fe
            WHERE fe.booking_id = b.id AND LOWER(fe.email) = LOWER($9)))
        AND ($10::text IS NULL OR b.uid = $10)
        AND ($11::timestamptz IS NULL OR b.start_time >= $11)
        AND ($12::timestamptz IS NULL OR b.end_time <= $12)
        "#,
        status = status_condition("$3", "$4"),
    )
}

/// Whose bookings a listing may return.
#[derive(Debug, Clone, Default)]
pub struct BookingVisibility {
    /// Bookings organized by these users are visible.
    pub organizer_ids: Vec<Uuid>,
    /// Bookings with an attendee of this email are visible.
    pub attendee_email: Option<String>,
}

/// Repository for booking database operations.
#[derive(Clone)]
pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    /// Creates a new BookingRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List one page of bookings matching the query.
    pub async fn list(
        &self,
        visibility: &BookingVisibility,
        query: &BookingQuery,
        now: DateTime<Utc>,
    ) -> Result<BookingPage, sqlx::Error> {
        let filters = &query.filters;
        let status = filters.status.to_string();
        let filter = list_filter();

        let timer = QueryTimer::new("list_bookings");
        let rows = sqlx::query_as::<_, BookingEntity>(&format!(
            r#"
            SELECT {BOOKING_COLUMNS}
            FROM {BOOKING_FROM}
            WHERE {filter}
            ORDER BY
                CASE WHEN $13 THEN b.start_time END ASC,
                CASE WHEN NOT $13 THEN b.start_time END DESC,
                b.id
            LIMIT $14 OFFSET $15
            "#
        ))
        .bind(&visibility.organizer_ids)
        .bind(visibility.attendee_email.as_deref())
        .bind(&status)
        .bind(now)
        .bind(&filters.event_type_ids)
        .bind(&filters.team_ids)
        .bind(&filters.user_ids)
        .bind(filters.attendee_name.as_deref())
        .bind(filters.attendee_email.as_deref())
        .bind(filters.booking_uid.as_deref())
        .bind(filters.after_start_date)
        .bind(filters.before_end_date)
        .bind(filters.status.sorts_ascending())
        .bind(query.limit)
        .bind(query.offset)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        let rows = rows?;

        let timer = QueryTimer::new("count_bookings");
        let total_count: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM {BOOKING_FROM} WHERE {filter}"
        ))
        .bind(&visibility.organizer_ids)
        .bind(visibility.attendee_email.as_deref())
        .bind(&status)
        .bind(now)
        .bind(&filters.event_type_ids)
        .bind(&filters.team_ids)
        .bind(&filters.user_ids)
        .bind(filters.attendee_name.as_deref())
        .bind(filters.attendee_email.as_deref())
        .bind(filters.booking_uid.as_deref())
        .bind(filters.after_start_date)
        .bind(filters.before_end_date)
        .fetch_one(&self.pool)
        .await?;
        timer.record();

        let mut series_ids: Vec<String> = rows
            .iter()
            .filter_map(|row| row.recurring_event_id.clone())
            .collect();
        series_ids.sort();
        series_ids.dedup();

        let recurring_info = if series_ids.is_empty() {
            Vec::new()
        } else {
            self.recurring_info(&series_ids, &status, now).await?
        };

        let bookings = self.attach_children(rows).await?;

        Ok(BookingPage {
            bookings,
            recurring_info: recurring_info.into_iter().map(Into::into).collect(),
            total_count,
        })
    }

    /// Aggregate the given recurring series under the same list status.
    async fn recurring_info(
        &self,
        series_ids: &[String],
        status: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<RecurringInfoEntity>, sqlx::Error> {
        let timer = QueryTimer::new("booking_recurring_info");
        let result = sqlx::query_as::<_, RecurringInfoEntity>(&format!(
            r#"
            SELECT b.recurring_event_id AS recurring_event_id,
                   COUNT(*) AS count,
                   MIN(b.start_time) AS first_date,
                   array_agg(b.id ORDER BY b.start_time, b.id) AS booking_ids
            FROM bookings b
            WHERE b.recurring_event_id = ANY($1)
              AND {status}
            GROUP BY b.recurring_event_id
            ORDER BY b.recurring_event_id
            "#,
            status = status_condition("$2", "$3"),
        ))
        .bind(series_ids)
        .bind(status)
        .bind(now)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Load child rows for the given bookings and assemble domain bookings,
    /// keeping the row order.
    async fn attach_children(&self, rows: Vec<BookingEntity>) -> Result<Vec<Booking>, sqlx::Error> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
        let mut children: HashMap<i64, BookingChildren> = HashMap::new();

        let timer = QueryTimer::new("booking_attendees");
        let attendees = sqlx::query_as::<_, AttendeeEntity>(
            r#"
            SELECT id, booking_id, email, name, time_zone, no_show
            FROM attendees
            WHERE booking_id = ANY($1)
            ORDER BY booking_id, id
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;
        timer.record();
        for attendee in attendees {
            children
                .entry(attendee.booking_id)
                .or_default()
                .attendees
                .push(attendee.into());
        }

        let timer = QueryTimer::new("booking_payments");
        let payments = sqlx::query_as::<_, PaymentEntity>(
            r#"
            SELECT id, booking_id, amount, currency, success, refunded, payment_option
            FROM payments
            WHERE booking_id = ANY($1)
            ORDER BY booking_id, id
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;
        timer.record();
        for payment in payments {
            children
                .entry(payment.booking_id)
                .or_default()
                .payments
                .push(payment.into());
        }

        let timer = QueryTimer::new("booking_references");
        let references = sqlx::query_as::<_, BookingReferenceEntity>(
            r#"
            SELECT booking_id, kind, uid, meeting_url
            FROM booking_references
            WHERE booking_id = ANY($1)
            ORDER BY booking_id, id
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;
        timer.record();
        for reference in references {
            children
                .entry(reference.booking_id)
                .or_default()
                .references
                .push(reference.into());
        }

        let timer = QueryTimer::new("booking_reports");
        let reports = sqlx::query_as::<_, BookingReportEntity>(
            r#"
            SELECT booking_id, reason, reported_at
            FROM booking_reports
            WHERE booking_id = ANY($1)
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;
        timer.record();
        for report in reports {
            let booking_id = report.booking_id;
            children.entry(booking_id).or_default().report = Some(report.into());
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let own = children.remove(&row.id).unwrap_or_default();
                row.into_booking(own)
            })
            .collect())
    }

    /// Find a booking by UID.
    pub async fn find_by_uid(&self, uid: &str) -> Result<Option<Booking>, sqlx::Error> {
        let timer = QueryTimer::new("find_booking_by_uid");
        let row = sqlx::query_as::<_, BookingEntity>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM {BOOKING_FROM} WHERE b.uid = $1"
        ))
        .bind(uid)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        match row? {
            Some(row) => Ok(self.attach_children(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    /// Find a booking by ID.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Booking>, sqlx::Error> {
        let timer = QueryTimer::new("find_booking_by_id");
        let row = sqlx::query_as::<_, BookingEntity>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM {BOOKING_FROM} WHERE b.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        match row? {
            Some(row) => Ok(self.attach_children(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    /// Set the no-show flag of attendees of a booking, matching emails
    /// case-insensitively. All updates commit together.
    pub async fn set_no_show(
        &self,
        booking_id: i64,
        attendees: &[NoShowAttendee],
    ) -> Result<Vec<NoShowAttendee>, sqlx::Error> {
        let timer = QueryTimer::new("set_attendee_no_show");
        let mut tx = self.pool.begin().await?;
        let mut updated = Vec::with_capacity(attendees.len());

        for attendee in attendees {
            let rows = sqlx::query_as::<_, (String, bool)>(
                r#"
                UPDATE attendees
                SET no_show = $3
                WHERE booking_id = $1 AND LOWER(email) = LOWER($2)
                RETURNING email, no_show
                "#,
            )
            .bind(booking_id)
            .bind(&attendee.email)
            .bind(attendee.no_show)
            .fetch_all(&mut *tx)
            .await?;

            updated.extend(
                rows.into_iter()
                    .map(|(email, no_show)| NoShowAttendee { email, no_show }),
            );
        }

        tx.commit().await?;
        timer.record();
        Ok(updated)
    }

    /// Replace the location of a booking. Returns whether the booking exists.
    pub async fn update_location(&self, booking_id: i64, location: &str) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("update_booking_location");
        let result = sqlx::query(
            r#"
            UPDATE bookings
            SET location = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(booking_id)
        .bind(location)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected() > 0)
    }

    /// Check whether a credential exists and belongs to the user.
    pub async fn credential_exists(&self, credential_id: i64, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("credential_exists");
        let result = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM credentials WHERE id = $1 AND user_id = $2)",
        )
        .bind(credential_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}
