//! Preconditions for booking mutations.
//!
//! Each check returns the first failing [`MutationError`] so the caller can
//! surface a single error code.

use chrono::{DateTime, Utc};

use super::booking_list::MutationError;
use crate::models::{Booking, NoShowAttendee};

/// How the viewer relates to a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingPermission {
    /// The viewer organizes the booking.
    Organizer,
    /// The viewer administers the organization the organizer belongs to.
    OrganizationAdmin,
    None,
}

impl BookingPermission {
    pub fn can_manage(self) -> bool {
        !matches!(self, BookingPermission::None)
    }
}

/// Check that attendees of a booking may be marked as no-shows.
pub fn check_no_show(
    booking: Option<&Booking>,
    permission: BookingPermission,
    attendees: &[NoShowAttendee],
    now: DateTime<Utc>,
) -> Result<(), MutationError> {
    let booking = booking.ok_or_else(MutationError::booking_not_found)?;

    if !permission.can_manage() {
        return Err(MutationError::unauthorized());
    }

    if booking.start_time > now {
        return Err(MutationError::booking_not_started());
    }

    if attendees.iter().any(|a| !booking.has_attendee(&a.email)) {
        return Err(MutationError::attendee_not_found());
    }

    Ok(())
}

/// Check that the location of a booking may be changed.
///
/// `credential_found` is `None` when no credential was requested.
pub fn check_location_edit(
    booking: Option<&Booking>,
    permission: BookingPermission,
    credential_found: Option<bool>,
) -> Result<(), MutationError> {
    if booking.is_none() {
        return Err(MutationError::booking_not_found());
    }

    if !permission.can_manage() {
        return Err(MutationError::unauthorized());
    }

    if credential_found == Some(false) {
        return Err(MutationError::credential_not_found());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Attendee, BookingStatus};
    use chrono::Duration;
    use uuid::Uuid;

    fn booking(start: DateTime<Utc>) -> Booking {
        Booking {
            id: 7,
            uid: "uid-7".to_string(),
            title: "Intro call".to_string(),
            status: BookingStatus::Accepted,
            start_time: start,
            end_time: start + Duration::minutes(30),
            recurring_event_id: None,
            location: None,
            paid: false,
            user_id: Some(Uuid::new_v4()),
            from_reschedule: None,
            rescheduled: None,
            is_recorded: false,
            routed_from_routing_form: false,
            event_type: None,
            attendees: vec![Attendee {
                id: 1,
                email: "Guest@Example.com".to_string(),
                name: "Guest".to_string(),
                time_zone: "UTC".to_string(),
                no_show: false,
            }],
            payments: vec![],
            references: vec![],
            report: None,
        }
    }

    fn mark(email: &str) -> Vec<NoShowAttendee> {
        vec![NoShowAttendee {
            email: email.to_string(),
            no_show: true,
        }]
    }

    #[test]
    fn test_no_show_missing_booking() {
        let err = check_no_show(None, BookingPermission::Organizer, &mark("a@b.c"), Utc::now())
            .unwrap_err();
        assert_eq!(err, MutationError::booking_not_found());
    }

    #[test]
    fn test_no_show_requires_permission() {
        let now = Utc::now();
        let b = booking(now - Duration::hours(1));
        let err = check_no_show(Some(&b), BookingPermission::None, &mark("guest@example.com"), now)
            .unwrap_err();
        assert_eq!(err.code, "UNAUTHORIZED");
    }

    #[test]
    fn test_no_show_before_start() {
        let now = Utc::now();
        let b = booking(now + Duration::hours(1));
        let err = check_no_show(
            Some(&b),
            BookingPermission::Organizer,
            &mark("guest@example.com"),
            now,
        )
        .unwrap_err();
        assert_eq!(err, MutationError::booking_not_started());
    }

    #[test]
    fn test_no_show_unknown_attendee() {
        let now = Utc::now();
        let b = booking(now - Duration::hours(1));
        let err = check_no_show(
            Some(&b),
            BookingPermission::OrganizationAdmin,
            &mark("stranger@example.com"),
            now,
        )
        .unwrap_err();
        assert_eq!(err, MutationError::attendee_not_found());
    }

    #[test]
    fn test_no_show_matches_email_case_insensitively() {
        let now = Utc::now();
        let b = booking(now - Duration::minutes(5));
        assert!(check_no_show(
            Some(&b),
            BookingPermission::Organizer,
            &mark("guest@example.com"),
            now
        )
        .is_ok());
    }

    #[test]
    fn test_location_edit_checks() {
        let b = booking(Utc::now());

        assert_eq!(
            check_location_edit(None, BookingPermission::Organizer, None).unwrap_err(),
            MutationError::booking_not_found()
        );
        assert_eq!(
            check_location_edit(Some(&b), BookingPermission::None, None).unwrap_err(),
            MutationError::unauthorized()
        );
        assert_eq!(
            check_location_edit(Some(&b), BookingPermission::Organizer, Some(false)).unwrap_err(),
            MutationError::credential_not_found()
        );
        assert!(check_location_edit(Some(&b), BookingPermission::Organizer, Some(true)).is_ok());
        assert!(check_location_edit(Some(&b), BookingPermission::OrganizationAdmin, None).is_ok());
    }
}
