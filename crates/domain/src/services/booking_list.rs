//! Booking list state: rows, selection navigation and mutation outcomes.
//!
//! Successful mutations never patch rows in place. They mark the list stale
//! so the caller refetches the page; failures leave the rows untouched and
//! produce a transient notice instead.

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use thiserror::Error;

use super::booking_rows::{build_rows_with_recurring_info, DataRow, Row};
use crate::models::{BookingListStatus, BookingPage};

/// Fallback message key for failures without a dedicated message.
pub const GENERIC_MUTATION_ERROR: &str = "something_went_wrong";

/// Error codes a booking mutation can fail with, and their message keys.
const MUTATION_ERROR_MESSAGES: &[(&str, &str)] = &[
    (
        "UNAUTHORIZED",
        "you_are_unauthorized_to_make_this_change_to_the_booking",
    ),
    ("BOOKING_NOT_FOUND", "booking_not_found"),
    ("ATTENDEE_NOT_FOUND", "attendee_not_found"),
    ("BOOKING_NOT_STARTED", "cannot_mark_no_show_before_meeting_starts"),
    ("CREDENTIAL_NOT_FOUND", "credential_not_found"),
    ("LOCATION_UPDATE_FAILED", "location_could_not_be_updated"),
];

/// Map a mutation error code to a user-facing message key.
pub fn mutation_error_message(code: &str) -> &'static str {
    MUTATION_ERROR_MESSAGES
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, message)| *message)
        .unwrap_or(GENERIC_MUTATION_ERROR)
}

/// A failed booking mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Booking mutation failed: {code}")]
pub struct MutationError {
    pub code: String,
}

impl MutationError {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }

    pub fn unauthorized() -> Self {
        Self::new("UNAUTHORIZED")
    }

    pub fn booking_not_found() -> Self {
        Self::new("BOOKING_NOT_FOUND")
    }

    pub fn attendee_not_found() -> Self {
        Self::new("ATTENDEE_NOT_FOUND")
    }

    pub fn booking_not_started() -> Self {
        Self::new("BOOKING_NOT_STARTED")
    }

    pub fn credential_not_found() -> Self {
        Self::new("CREDENTIAL_NOT_FOUND")
    }

    pub fn location_update_failed() -> Self {
        Self::new("LOCATION_UPDATE_FAILED")
    }

    /// User-facing message key for this error.
    pub fn message_key(&self) -> &'static str {
        mutation_error_message(&self.code)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Success,
    Error,
}

/// A transient, non-blocking notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Notice {
    pub kind: NoticeKind,
    pub message_key: &'static str,
}

/// Previous/next traversal over the data rows of a booking list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingNavigator {
    uids: Vec<String>,
    selected: Option<usize>,
}

impl BookingNavigator {
    /// Build a navigator over the data rows; separators are skipped.
    pub fn from_rows(rows: &[Row]) -> Self {
        Self {
            uids: data_uids(rows),
            selected: None,
        }
    }

    /// Rebuild over new rows, keeping the selection when the selected
    /// booking is still listed.
    pub fn recompute(&mut self, rows: &[Row]) {
        let selected_uid = self.selected_uid().map(str::to_string);
        self.uids = data_uids(rows);
        self.selected = selected_uid.and_then(|uid| self.position(&uid));
    }

    fn position(&self, uid: &str) -> Option<usize> {
        self.uids.iter().position(|u| u == uid)
    }

    /// Select a booking by uid. Returns false when it is not listed.
    pub fn select(&mut self, uid: &str) -> bool {
        self.selected = self.position(uid);
        self.selected.is_some()
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_uid(&self) -> Option<&str> {
        self.selected.map(|i| self.uids[i].as_str())
    }

    pub fn has_next(&self) -> bool {
        matches!(self.selected, Some(i) if i + 1 < self.uids.len())
    }

    pub fn has_previous(&self) -> bool {
        matches!(self.selected, Some(i) if i > 0)
    }

    /// Move to the next booking, staying put at the end.
    pub fn next(&mut self) -> Option<&str> {
        if self.has_next() {
            self.selected = self.selected.map(|i| i + 1);
        }
        self.selected_uid()
    }

    /// Move to the previous booking, staying put at the start.
    pub fn previous(&mut self) -> Option<&str> {
        if self.has_previous() {
            self.selected = self.selected.map(|i| i - 1);
        }
        self.selected_uid()
    }

    pub fn len(&self) -> usize {
        self.uids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uids.is_empty()
    }
}

fn data_uids(rows: &[Row]) -> Vec<String> {
    rows.iter()
        .filter_map(Row::as_data)
        .map(|d| d.booking.uid.clone())
        .collect()
}

/// View state of one booking list tab.
#[derive(Debug, Clone)]
pub struct BookingListState {
    status: BookingListStatus,
    rows: Vec<Row>,
    total_count: i64,
    navigator: BookingNavigator,
    stale: bool,
    notice: Option<Notice>,
}

impl BookingListState {
    pub fn new(status: BookingListStatus) -> Self {
        Self {
            status,
            rows: Vec::new(),
            total_count: 0,
            navigator: BookingNavigator::default(),
            stale: true,
            notice: None,
        }
    }

    /// Replace the rows with a freshly fetched page.
    pub fn load<Tz: TimeZone>(&mut self, page: &BookingPage, tz: &Tz, now: DateTime<Utc>) {
        self.rows = build_rows_with_recurring_info(
            &page.bookings,
            &page.recurring_info,
            tz,
            self.status,
            now,
        );
        self.total_count = page.total_count;
        self.navigator.recompute(&self.rows);
        self.stale = false;
    }

    pub fn status(&self) -> BookingListStatus {
        self.status
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn data_rows(&self) -> impl Iterator<Item = &DataRow> {
        self.rows.iter().filter_map(Row::as_data)
    }

    pub fn total_count(&self) -> i64 {
        self.total_count
    }

    pub fn navigator(&self) -> &BookingNavigator {
        &self.navigator
    }

    pub fn navigator_mut(&mut self) -> &mut BookingNavigator {
        &mut self.navigator
    }

    /// Whether the rows need refetching before they can be trusted.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn invalidate(&mut self) {
        self.stale = true;
    }

    /// Record the outcome of a mutation.
    ///
    /// Success invalidates the list; failure sets an error notice.
    pub fn apply_mutation_result<T>(
        &mut self,
        result: Result<T, MutationError>,
        success_key: &'static str,
    ) -> Option<T> {
        match result {
            Ok(value) => {
                self.invalidate();
                self.notice = Some(Notice {
                    kind: NoticeKind::Success,
                    message_key: success_key,
                });
                Some(value)
            }
            Err(err) => {
                tracing::debug!(code = %err.code, "Booking mutation failed");
                self.notice = Some(Notice {
                    kind: NoticeKind::Error,
                    message_key: err.message_key(),
                });
                None
            }
        }
    }

    /// Take the pending notice, if any.
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }
}
