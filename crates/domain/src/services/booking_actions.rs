//! Per-booking action derivation.
//!
//! Actions are computed in two pure steps:
//! 1. [`derive_flags`] reduces a booking and the viewer context to flags.
//! 2. [`available_actions`] turns flags into visible action groups.
//!
//! [`dispatch`] maps a chosen action to what the client should do next:
//! open a dialog, run a mutation, or navigate.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{
    Booking, BookingListStatus, BookingStatus, NoShowAttendee, PaymentOption, SchedulingType,
};

/// Who is looking at the booking list, and when.
#[derive(Debug, Clone, Copy)]
pub struct ActionContext<'a> {
    pub now: DateTime<Utc>,
    pub viewer_id: Option<Uuid>,
    pub viewer_email: Option<&'a str>,
    pub list_status: BookingListStatus,
}

/// Booking state reduced to the predicates action visibility depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct BookingFlags {
    pub is_upcoming: bool,
    pub is_past: bool,
    pub is_ongoing: bool,
    pub is_cancelled: bool,
    pub is_pending: bool,
    pub is_confirmed: bool,
    pub is_rejected: bool,
    pub is_recurring: bool,
    pub is_tab_recurring: bool,
    pub is_tab_unconfirmed: bool,
    pub is_attendee: bool,
    pub show_pending_payment: bool,
    pub has_held_payment: bool,
    pub is_cal_video_location: bool,
    pub is_booking_from_routing_form: bool,
    pub is_recorded: bool,
    pub is_reported: bool,
    pub is_seated: bool,
    pub is_team_round_robin: bool,
    pub has_attendees: bool,
    pub disable_cancelling: bool,
    pub disable_rescheduling: bool,
}

/// Derive action flags for one booking.
pub fn derive_flags(booking: &Booking, ctx: &ActionContext<'_>) -> BookingFlags {
    let event_type = booking.event_type.as_ref();

    let is_organizer = ctx.viewer_id.is_some() && ctx.viewer_id == booking.user_id;
    let is_attendee = !is_organizer
        && ctx
            .viewer_email
            .map(|email| booking.has_attendee(email))
            .unwrap_or(false);

    let has_successful_payment = booking.payments.iter().any(|p| p.success);

    BookingFlags {
        is_upcoming: booking.end_time >= ctx.now,
        is_past: booking.end_time < ctx.now,
        is_ongoing: booking.start_time <= ctx.now && ctx.now < booking.end_time,
        is_cancelled: booking.status == BookingStatus::Cancelled,
        is_pending: booking.status == BookingStatus::Pending,
        is_confirmed: booking.status == BookingStatus::Accepted,
        is_rejected: booking.status == BookingStatus::Rejected,
        is_recurring: booking.is_recurring(),
        is_tab_recurring: ctx.list_status == BookingListStatus::Recurring,
        is_tab_unconfirmed: ctx.list_status == BookingListStatus::Unconfirmed,
        is_attendee,
        show_pending_payment: !booking.paid
            && !booking.payments.is_empty()
            && !has_successful_payment,
        has_held_payment: booking
            .payments
            .iter()
            .any(|p| p.payment_option == PaymentOption::Hold && !p.success && !p.refunded),
        is_cal_video_location: booking.uses_cal_video(),
        is_booking_from_routing_form: booking.routed_from_routing_form
            && event_type.and_then(|et| et.team_id).is_some(),
        is_recorded: booking.is_recorded,
        is_reported: booking.report.is_some(),
        is_seated: event_type
            .and_then(|et| et.seats_per_time_slot)
            .is_some(),
        is_team_round_robin: event_type
            .and_then(|et| et.scheduling_type)
            .map(|st| st == SchedulingType::RoundRobin)
            .unwrap_or(false),
        has_attendees: !booking.attendees.is_empty(),
        disable_cancelling: event_type.map(|et| et.disable_cancelling).unwrap_or(false),
        disable_rescheduling: event_type
            .map(|et| et.disable_rescheduling)
            .unwrap_or(false),
    }
}

/// Identifier of a booking action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionId {
    Reject,
    Confirm,
    Reschedule,
    RequestReschedule,
    Reroute,
    EditLocation,
    AddGuests,
    Reassign,
    ViewRecordings,
    SessionDetails,
    ChargeCard,
    MarkNoShow,
    Cancel,
    Report,
}

/// One entry of a booking's action menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct BookingAction {
    pub id: ActionId,
    /// Translation key for the menu label.
    pub label_key: &'static str,
    pub disabled: bool,
}

impl BookingAction {
    fn new(id: ActionId, label_key: &'static str) -> Self {
        Self {
            id,
            label_key,
            disabled: false,
        }
    }

    fn disabled_if(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

/// Actions available for a booking, grouped the way the menu renders them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ActionGroups {
    pub pending: Vec<BookingAction>,
    pub edit: Vec<BookingAction>,
    pub after_event: Vec<BookingAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel: Option<BookingAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<BookingAction>,
}

impl ActionGroups {
    /// All visible action ids in menu order.
    pub fn visible_ids(&self) -> Vec<ActionId> {
        self.pending
            .iter()
            .chain(&self.edit)
            .chain(&self.after_event)
            .chain(self.cancel.iter())
            .chain(self.report.iter())
            .map(|a| a.id)
            .collect()
    }

    /// Find a visible action by id.
    pub fn find(&self, id: ActionId) -> Option<&BookingAction> {
        self.pending
            .iter()
            .chain(&self.edit)
            .chain(&self.after_event)
            .chain(self.cancel.iter())
            .chain(self.report.iter())
            .find(|a| a.id == id)
    }
}

fn shows_pending_actions(flags: &BookingFlags) -> bool {
    flags.is_pending
        && !flags.is_cancelled
        && !flags.is_rejected
        && (flags.is_upcoming || flags.is_tab_recurring)
}

fn shows_edit_actions(flags: &BookingFlags) -> bool {
    !flags.is_pending && !flags.is_cancelled && !flags.is_rejected && !flags.is_past
}

fn shows_after_event_actions(flags: &BookingFlags) -> bool {
    (flags.is_past || flags.is_ongoing) && flags.is_confirmed
}

fn shows_cancel_action(flags: &BookingFlags) -> bool {
    !flags.is_cancelled && !flags.is_rejected
}

/// Compute the visible actions for a booking from its flags.
pub fn available_actions(flags: &BookingFlags) -> ActionGroups {
    let mut groups = ActionGroups::default();
    let whole_series = flags.is_tab_recurring && flags.is_recurring;

    if shows_pending_actions(flags) {
        let (reject, confirm) = if whole_series {
            ("reject_all", "confirm_all")
        } else {
            ("reject", "confirm")
        };
        groups.pending = vec![
            BookingAction::new(ActionId::Reject, reject).disabled_if(flags.is_attendee),
            BookingAction::new(ActionId::Confirm, confirm).disabled_if(flags.is_attendee),
        ];
    }

    if shows_edit_actions(flags) {
        let edit = &mut groups.edit;
        edit.push(
            BookingAction::new(ActionId::Reschedule, "reschedule_booking")
                .disabled_if(flags.disable_rescheduling),
        );
        if !flags.is_attendee {
            edit.push(
                BookingAction::new(ActionId::RequestReschedule, "send_reschedule_request")
                    .disabled_if(flags.disable_rescheduling),
            );
        }
        if flags.is_booking_from_routing_form {
            edit.push(BookingAction::new(ActionId::Reroute, "reroute"));
        }
        if !flags.is_attendee {
            edit.push(BookingAction::new(ActionId::EditLocation, "edit_location"));
        }
        if !flags.is_seated {
            edit.push(BookingAction::new(ActionId::AddGuests, "additional_guests"));
        }
        if flags.is_team_round_robin && !flags.is_attendee {
            edit.push(BookingAction::new(ActionId::Reassign, "reassign"));
        }
    }

    if shows_after_event_actions(flags) {
        let after = &mut groups.after_event;
        if flags.is_cal_video_location {
            after.push(
                BookingAction::new(ActionId::ViewRecordings, "view_recordings")
                    .disabled_if(!flags.is_recorded),
            );
            after.push(BookingAction::new(
                ActionId::SessionDetails,
                "view_session_details",
            ));
        }
        if flags.has_held_payment && !flags.is_attendee {
            after.push(BookingAction::new(ActionId::ChargeCard, "charge_card"));
        }
        if flags.has_attendees && !flags.is_attendee {
            after.push(BookingAction::new(ActionId::MarkNoShow, "mark_as_no_show"));
        }
    }

    if shows_cancel_action(flags) {
        let label = if whole_series {
            "cancel_all_remaining"
        } else {
            "cancel_event"
        };
        groups.cancel = Some(
            BookingAction::new(ActionId::Cancel, label)
                .disabled_if(flags.disable_cancelling || flags.is_past),
        );
    }

    if !flags.is_reported {
        groups.report = Some(BookingAction::new(ActionId::Report, "report_booking"));
    }

    groups
}

/// Dialogs a client can open for a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialog {
    RejectionReason,
    RequestReschedule,
    Reroute,
    EditLocation,
    AddGuests,
    Reassign,
    ViewRecordings,
    MeetingSessionDetails,
    ChargeCard,
    NoShowAttendees,
    ReportBooking,
}

/// Mutations a client can run directly from the menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MutationKind {
    Confirm {
        booking_id: i64,
        all_remaining: bool,
    },
    MarkNoShow {
        booking_uid: String,
        attendees: Vec<NoShowAttendee>,
    },
}

/// What selecting an action results in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Dispatch {
    OpenDialog { dialog: Dialog },
    Mutation(MutationKind),
    Navigate { path: String },
}

fn open(dialog: Dialog) -> Dispatch {
    Dispatch::OpenDialog { dialog }
}

/// Map an action to its follow-up for the given booking.
pub fn dispatch(action: ActionId, booking: &Booking, list_status: BookingListStatus) -> Dispatch {
    let whole_series = list_status == BookingListStatus::Recurring && booking.is_recurring();

    match action {
        ActionId::Reject => open(Dialog::RejectionReason),
        ActionId::Confirm => Dispatch::Mutation(MutationKind::Confirm {
            booking_id: booking.id,
            all_remaining: whole_series,
        }),
        ActionId::Reschedule => Dispatch::Navigate {
            path: format!("/reschedule/{}", booking.uid),
        },
        ActionId::RequestReschedule => open(Dialog::RequestReschedule),
        ActionId::Reroute => open(Dialog::Reroute),
        ActionId::EditLocation => open(Dialog::EditLocation),
        ActionId::AddGuests => open(Dialog::AddGuests),
        ActionId::Reassign => open(Dialog::Reassign),
        ActionId::ViewRecordings => open(Dialog::ViewRecordings),
        ActionId::SessionDetails => open(Dialog::MeetingSessionDetails),
        ActionId::ChargeCard => open(Dialog::ChargeCard),
        ActionId::MarkNoShow => match booking.attendees.as_slice() {
            [single] => Dispatch::Mutation(MutationKind::MarkNoShow {
                booking_uid: booking.uid.clone(),
                attendees: vec![NoShowAttendee {
                    email: single.email.clone(),
                    no_show: !single.no_show,
                }],
            }),
            _ => open(Dialog::NoShowAttendees),
        },
        ActionId::Cancel => {
            let mut path = format!("/booking/{}?cancel=true", booking.uid);
            if whole_series {
                path.push_str("&allRemainingBookings=true");
            }
            Dispatch::Navigate { path }
        }
        ActionId::Report => open(Dialog::ReportBooking),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Attendee, BookingReference, BookingReport, EventTypeSummary, Payment,
    };
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap()
    }

    fn booking(status: BookingStatus, starts_in: Duration) -> Booking {
        let start = now() + starts_in;
        Booking {
            id: 7,
            uid: "abc123".to_string(),
            title: "Intro call".to_string(),
            status,
            start_time: start,
            end_time: start + Duration::minutes(30),
            recurring_event_id: None,
            location: None,
            paid: false,
            user_id: None,
            from_reschedule: None,
            rescheduled: None,
            is_recorded: false,
            routed_from_routing_form: false,
            event_type: Some(EventTypeSummary {
                id: 1,
                title: "Intro".to_string(),
                ..Default::default()
            }),
            attendees: vec![attendee("guest@example.com")],
            payments: vec![],
            references: vec![],
            report: None,
        }
    }

    fn attendee(email: &str) -> Attendee {
        Attendee {
            id: 1,
            email: email.to_string(),
            name: "Guest".to_string(),
            time_zone: "Europe/Berlin".to_string(),
            no_show: false,
        }
    }

    fn ctx(list_status: BookingListStatus) -> ActionContext<'static> {
        ActionContext {
            now: now(),
            viewer_id: None,
            viewer_email: None,
            list_status,
        }
    }

    fn actions_for(booking: &Booking, list_status: BookingListStatus) -> ActionGroups {
        available_actions(&derive_flags(booking, &ctx(list_status)))
    }

    #[test]
    fn test_pending_booking_shows_pending_and_cancel_only() {
        let b = booking(BookingStatus::Pending, Duration::days(2));
        let groups = actions_for(&b, BookingListStatus::Unconfirmed);

        assert_eq!(
            groups.pending.iter().map(|a| a.id).collect::<Vec<_>>(),
            vec![ActionId::Reject, ActionId::Confirm]
        );
        assert!(groups.edit.is_empty());
        assert!(groups.after_event.is_empty());
        let cancel = groups.cancel.expect("cancel visible");
        assert!(!cancel.disabled);
    }

    #[test]
    fn test_confirmed_upcoming_shows_edit_actions() {
        let b = booking(BookingStatus::Accepted, Duration::days(2));
        let groups = actions_for(&b, BookingListStatus::Upcoming);

        assert!(groups.pending.is_empty());
        let edit: Vec<_> = groups.edit.iter().map(|a| a.id).collect();
        assert_eq!(
            edit,
            vec![
                ActionId::Reschedule,
                ActionId::RequestReschedule,
                ActionId::EditLocation,
                ActionId::AddGuests
            ]
        );
        assert!(groups.after_event.is_empty());
        assert!(groups.cancel.is_some());
        assert!(groups.report.is_some());
    }

    #[test]
    fn test_disable_rescheduling_disables_reschedule_items() {
        let mut b = booking(BookingStatus::Accepted, Duration::days(2));
        if let Some(et) = b.event_type.as_mut() {
            et.disable_rescheduling = true;
        }
        let groups = actions_for(&b, BookingListStatus::Upcoming);

        assert!(groups.find(ActionId::Reschedule).unwrap().disabled);
        assert!(groups.find(ActionId::RequestReschedule).unwrap().disabled);
        assert!(!groups.find(ActionId::EditLocation).unwrap().disabled);
    }

    #[test]
    fn test_disable_cancelling_disables_cancel() {
        let mut b = booking(BookingStatus::Accepted, Duration::days(2));
        if let Some(et) = b.event_type.as_mut() {
            et.disable_cancelling = true;
        }
        let groups = actions_for(&b, BookingListStatus::Upcoming);
        assert!(groups.cancel.unwrap().disabled);
    }

    #[test]
    fn test_cancelled_booking_has_no_cancel_or_edit() {
        let b = booking(BookingStatus::Cancelled, Duration::days(2));
        let groups = actions_for(&b, BookingListStatus::Cancelled);

        assert!(groups.cancel.is_none());
        assert!(groups.edit.is_empty());
        assert!(groups.pending.is_empty());
        assert_eq!(groups.visible_ids(), vec![ActionId::Report]);
    }

    #[test]
    fn test_rejected_booking_has_no_pending_actions() {
        let b = booking(BookingStatus::Rejected, Duration::days(2));
        let groups = actions_for(&b, BookingListStatus::Cancelled);
        assert!(groups.pending.is_empty());
        assert!(groups.cancel.is_none());
    }

    #[test]
    fn test_past_confirmed_shows_after_event_actions() {
        let mut b = booking(BookingStatus::Accepted, -Duration::days(1));
        b.location = Some(crate::models::booking::CAL_VIDEO_LOCATION.to_string());
        b.payments = vec![Payment {
            id: 1,
            amount: 5000,
            currency: "usd".to_string(),
            success: false,
            refunded: false,
            payment_option: PaymentOption::Hold,
        }];

        let groups = actions_for(&b, BookingListStatus::Past);

        assert!(groups.edit.is_empty());
        assert_eq!(
            groups.after_event.iter().map(|a| a.id).collect::<Vec<_>>(),
            vec![
                ActionId::ViewRecordings,
                ActionId::SessionDetails,
                ActionId::ChargeCard,
                ActionId::MarkNoShow
            ]
        );
        assert!(groups.find(ActionId::ViewRecordings).unwrap().disabled);
        assert!(groups.cancel.unwrap().disabled);
    }

    #[test]
    fn test_video_reference_counts_as_cal_video() {
        let mut b = booking(BookingStatus::Accepted, -Duration::days(1));
        b.is_recorded = true;
        b.references = vec![BookingReference {
            kind: "daily_video".to_string(),
            uid: "room".to_string(),
            meeting_url: None,
        }];

        let flags = derive_flags(&b, &ctx(BookingListStatus::Past));
        assert!(flags.is_cal_video_location);
        let groups = available_actions(&flags);
        assert!(!groups.find(ActionId::ViewRecordings).unwrap().disabled);
    }

    #[test]
    fn test_ongoing_booking_is_upcoming_and_ongoing() {
        let b = booking(BookingStatus::Accepted, -Duration::minutes(10));
        let flags = derive_flags(&b, &ctx(BookingListStatus::Upcoming));

        assert!(flags.is_ongoing);
        assert!(flags.is_upcoming);
        assert!(!flags.is_past);
        let groups = available_actions(&flags);
        assert!(groups.find(ActionId::MarkNoShow).is_some());
        assert!(groups.find(ActionId::Reschedule).is_some());
    }

    #[test]
    fn test_attendee_viewer_loses_host_actions() {
        let b = booking(BookingStatus::Accepted, Duration::days(2));
        let context = ActionContext {
            viewer_email: Some("GUEST@example.com"),
            ..ctx(BookingListStatus::Upcoming)
        };
        let flags = derive_flags(&b, &context);
        assert!(flags.is_attendee);

        let groups = available_actions(&flags);
        assert!(groups.find(ActionId::RequestReschedule).is_none());
        assert!(groups.find(ActionId::EditLocation).is_none());
        assert!(groups.find(ActionId::Reschedule).is_some());
    }

    #[test]
    fn test_organizer_is_never_attendee() {
        let organizer = Uuid::new_v4();
        let mut b = booking(BookingStatus::Accepted, Duration::days(2));
        b.user_id = Some(organizer);
        let context = ActionContext {
            viewer_id: Some(organizer),
            viewer_email: Some("guest@example.com"),
            ..ctx(BookingListStatus::Upcoming)
        };
        assert!(!derive_flags(&b, &context).is_attendee);
    }

    #[test]
    fn test_pending_payment_flag() {
        let mut b = booking(BookingStatus::Accepted, Duration::days(2));
        b.payments = vec![Payment {
            id: 1,
            amount: 1000,
            currency: "eur".to_string(),
            success: false,
            refunded: false,
            payment_option: PaymentOption::OnBooking,
        }];
        assert!(derive_flags(&b, &ctx(BookingListStatus::Upcoming)).show_pending_payment);

        b.paid = true;
        assert!(!derive_flags(&b, &ctx(BookingListStatus::Upcoming)).show_pending_payment);
    }

    #[test]
    fn test_routing_form_and_round_robin_actions() {
        let mut b = booking(BookingStatus::Accepted, Duration::days(2));
        b.routed_from_routing_form = true;
        if let Some(et) = b.event_type.as_mut() {
            et.team_id = Some(Uuid::new_v4());
            et.scheduling_type = Some(SchedulingType::RoundRobin);
        }
        let groups = actions_for(&b, BookingListStatus::Upcoming);

        assert!(groups.find(ActionId::Reroute).is_some());
        assert!(groups.find(ActionId::Reassign).is_some());
    }

    #[test]
    fn test_seated_event_hides_add_guests() {
        let mut b = booking(BookingStatus::Accepted, Duration::days(2));
        if let Some(et) = b.event_type.as_mut() {
            et.seats_per_time_slot = Some(10);
        }
        let groups = actions_for(&b, BookingListStatus::Upcoming);
        assert!(groups.find(ActionId::AddGuests).is_none());
    }

    #[test]
    fn test_reported_booking_hides_report() {
        let mut b = booking(BookingStatus::Accepted, Duration::days(2));
        b.report = Some(BookingReport {
            reason: "spam".to_string(),
            reported_at: now(),
        });
        assert!(actions_for(&b, BookingListStatus::Upcoming).report.is_none());
    }

    #[test]
    fn test_recurring_tab_labels_whole_series() {
        let mut b = booking(BookingStatus::Pending, Duration::days(2));
        b.recurring_event_id = Some("series".to_string());
        let groups = actions_for(&b, BookingListStatus::Recurring);

        assert_eq!(groups.find(ActionId::Confirm).unwrap().label_key, "confirm_all");
        assert_eq!(groups.cancel.unwrap().label_key, "cancel_all_remaining");
    }

    #[test]
    fn test_dispatch_single_attendee_toggles_no_show() {
        let b = booking(BookingStatus::Accepted, -Duration::days(1));
        let result = dispatch(ActionId::MarkNoShow, &b, BookingListStatus::Past);

        assert_eq!(
            result,
            Dispatch::Mutation(MutationKind::MarkNoShow {
                booking_uid: "abc123".to_string(),
                attendees: vec![NoShowAttendee {
                    email: "guest@example.com".to_string(),
                    no_show: true,
                }],
            })
        );
    }

    #[test]
    fn test_dispatch_many_attendees_opens_dialog() {
        let mut b = booking(BookingStatus::Accepted, -Duration::days(1));
        b.attendees.push(attendee("second@example.com"));
        assert_eq!(
            dispatch(ActionId::MarkNoShow, &b, BookingListStatus::Past),
            Dispatch::OpenDialog {
                dialog: Dialog::NoShowAttendees
            }
        );
    }

    #[test]
    fn test_dispatch_cancel_series_path() {
        let mut b = booking(BookingStatus::Accepted, Duration::days(1));
        b.recurring_event_id = Some("series".to_string());

        assert_eq!(
            dispatch(ActionId::Cancel, &b, BookingListStatus::Recurring),
            Dispatch::Navigate {
                path: "/booking/abc123?cancel=true&allRemainingBookings=true".to_string()
            }
        );
        assert_eq!(
            dispatch(ActionId::Cancel, &b, BookingListStatus::Upcoming),
            Dispatch::Navigate {
                path: "/booking/abc123?cancel=true".to_string()
            }
        );
    }
}
