//! Booking list row grouping.
//!
//! Turns one page of bookings into the ordered rows a booking table renders:
//! data rows, optionally preceded by section separators.
//!
//! Bookings are bucketed by the calendar date of their start time in the
//! viewer's time zone:
//! 1. Today
//! 2. The rest of the current month
//! 3. One bucket per other year-month, ascending
//!
//! Only the upcoming tab renders separators and the Today bucket. Every other
//! tab renders this month followed by the month buckets, without separators,
//! and leaves out bookings that start today.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use serde::Serialize;

use crate::models::{Booking, BookingListStatus, RecurringInfo};

/// A calendar month, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Zero-padded `YYYY-MM` key.
    pub fn as_key(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    fn month_name(&self) -> &'static str {
        const NAMES: [&str; 12] = [
            "January",
            "February",
            "March",
            "April",
            "May",
            "June",
            "July",
            "August",
            "September",
            "October",
            "November",
            "December",
        ];
        NAMES[(self.month.clamp(1, 12) - 1) as usize]
    }
}

impl std::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.month_name(), self.year)
    }
}

/// Label carried by a separator row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SectionLabel {
    Today,
    ThisMonth,
    Month(MonthKey),
}

impl std::fmt::Display for SectionLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SectionLabel::Today => write!(f, "Today"),
            SectionLabel::ThisMonth => write!(f, "This Month"),
            SectionLabel::Month(key) => write!(f, "{}", key),
        }
    }
}

/// Recurring series metadata attached to the row that represents the series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SeriesSummary {
    pub recurring_event_id: String,
    /// Occurrences of the series seen on this page, including the shown one.
    pub occurrences_on_page: usize,
    /// Occurrences matching the filters across all pages, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_date: Option<DateTime<Utc>>,
}

/// A row wrapping one booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DataRow {
    pub booking: Booking,
    pub is_today: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series: Option<SeriesSummary>,
}

/// One row of the booking table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Row {
    Data(DataRow),
    Separator { label: SectionLabel },
}

impl Row {
    /// The wrapped data row, if this is not a separator.
    pub fn as_data(&self) -> Option<&DataRow> {
        match self {
            Row::Data(data) => Some(data),
            Row::Separator { .. } => None,
        }
    }

    pub fn is_separator(&self) -> bool {
        matches!(self, Row::Separator { .. })
    }
}

/// Build table rows for a page of bookings.
pub fn build_rows<Tz: TimeZone>(
    bookings: &[Booking],
    tz: &Tz,
    status: BookingListStatus,
    now: DateTime<Utc>,
) -> Vec<Row> {
    build_rows_with_recurring_info(bookings, &[], tz, status, now)
}

/// Build table rows, merging series totals returned by the booking query.
pub fn build_rows_with_recurring_info<Tz: TimeZone>(
    bookings: &[Booking],
    recurring_info: &[RecurringInfo],
    tz: &Tz,
    status: BookingListStatus,
    now: DateTime<Utc>,
) -> Vec<Row> {
    let kept = collapse_series(bookings, status);
    let info_by_series: HashMap<&str, &RecurringInfo> = recurring_info
        .iter()
        .map(|info| (info.recurring_event_id.as_str(), info))
        .collect();

    let today = now.with_timezone(tz).date_naive();
    let this_month = MonthKey::of(today);

    let mut today_rows = Vec::new();
    let mut this_month_rows = Vec::new();
    let mut month_rows: BTreeMap<MonthKey, Vec<Row>> = BTreeMap::new();

    for (booking, occurrences) in kept {
        let start = booking.start_time.with_timezone(tz).date_naive();
        let is_today = start == today;

        let series = booking.recurring_event_id.as_ref().map(|id| {
            let info = info_by_series.get(id.as_str());
            SeriesSummary {
                recurring_event_id: id.clone(),
                occurrences_on_page: occurrences,
                total_count: info.map(|i| i.count),
                first_date: info.and_then(|i| i.first_date),
            }
        });

        let row = Row::Data(DataRow {
            booking: booking.clone(),
            is_today,
            series,
        });

        let month = MonthKey::of(start);
        if is_today {
            today_rows.push(row);
        } else if month == this_month {
            this_month_rows.push(row);
        } else {
            month_rows.entry(month).or_default().push(row);
        }
    }

    let mut rows = Vec::with_capacity(bookings.len() + month_rows.len() + 2);

    if status == BookingListStatus::Upcoming {
        push_section(&mut rows, SectionLabel::Today, today_rows);
        push_section(&mut rows, SectionLabel::ThisMonth, this_month_rows);
        for (month, month_bucket) in month_rows {
            push_section(&mut rows, SectionLabel::Month(month), month_bucket);
        }
    } else {
        rows.extend(this_month_rows);
        rows.extend(month_rows.into_values().flatten());
    }

    rows
}

fn push_section(rows: &mut Vec<Row>, label: SectionLabel, bucket: Vec<Row>) {
    if bucket.is_empty() {
        return;
    }
    rows.push(Row::Separator { label });
    rows.extend(bucket);
}

/// Keep the first occurrence of each recurring series when the tab collapses
/// series, counting how many occurrences were folded into it.
fn collapse_series(bookings: &[Booking], status: BookingListStatus) -> Vec<(&Booking, usize)> {
    if !status.collapses_recurring() {
        return bookings
            .iter()
            .map(|b| (b, usize::from(b.is_recurring())))
            .collect();
    }

    let mut kept: Vec<(&Booking, usize)> = Vec::with_capacity(bookings.len());
    let mut series_index: HashMap<&str, usize> = HashMap::new();

    for booking in bookings {
        match booking.recurring_event_id.as_deref() {
            Some(series_id) => match series_index.get(series_id) {
                Some(&index) => kept[index].1 += 1,
                None => {
                    series_index.insert(series_id, kept.len());
                    kept.push((booking, 1));
                }
            },
            None => kept.push((booking, 0)),
        }
    }

    kept
}
