//! Booking list and booking mutation endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use domain::models::{
    Booking, BookingFilters, BookingListStatus, BookingQuery, EditLocationRequest,
    EditLocationResponse, ListBookingsQuery, MarkNoShowRequest, MarkNoShowResponse,
    RecurringInfo,
};
use domain::services::{
    available_actions, check_location_edit, check_no_show, derive_flags,
    resolve_accessible_users, ActionContext, ActionGroups, BookingFlags, BookingListState,
    BookingPermission, DataRow, MembershipStore, MutationError, Row, SectionLabel, StoreError,
};
use persistence::repositories::{
    BookingRepository, BookingVisibility, MembershipRepository, UserRepository,
};
use serde::Serialize;
use shared::validation::{clamp_page_size, parse_id_list, parse_utc_offset, validate_offset};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::middleware::metrics;

/// One row of the booking table as returned to clients.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BookingRowResponse {
    Data {
        #[serde(flatten)]
        row: DataRow,
        flags: BookingFlags,
        actions: ActionGroups,
    },
    Separator {
        label: SectionLabel,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListBookingsResponse {
    pub status: BookingListStatus,
    pub rows: Vec<BookingRowResponse>,
    pub recurring_info: Vec<RecurringInfo>,
    pub total_count: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Narrow a requested organizer filter to users the viewer may see.
///
/// The viewer is always visible to themselves; anyone else has to be an
/// accepted member of the organization the viewer administers.
async fn visible_user_filter<S>(
    store: &S,
    viewer_id: Uuid,
    requested: &[Uuid],
) -> Result<Vec<Uuid>, StoreError>
where
    S: MembershipStore + ?Sized,
{
    let others: Vec<Uuid> = requested
        .iter()
        .copied()
        .filter(|id| *id != viewer_id)
        .collect();

    let mut visible = resolve_accessible_users(store, viewer_id, &others).await?;
    if requested.contains(&viewer_id) {
        visible.push(viewer_id);
    }
    visible.sort();
    visible.dedup();
    Ok(visible)
}

/// How the viewer relates to a booking's organizer.
async fn booking_permission<S>(
    store: &S,
    viewer_id: Uuid,
    booking: Option<&Booking>,
) -> Result<BookingPermission, StoreError>
where
    S: MembershipStore + ?Sized,
{
    let Some(organizer_id) = booking.and_then(|b| b.user_id) else {
        return Ok(BookingPermission::None);
    };

    if organizer_id == viewer_id {
        return Ok(BookingPermission::Organizer);
    }

    let accessible = resolve_accessible_users(store, viewer_id, &[organizer_id]).await?;
    if accessible.contains(&organizer_id) {
        Ok(BookingPermission::OrganizationAdmin)
    } else {
        Ok(BookingPermission::None)
    }
}

/// Attach flags and actions to built rows.
fn row_responses(rows: &[Row], ctx: &ActionContext<'_>) -> Vec<BookingRowResponse> {
    rows.iter()
        .map(|row| match row {
            Row::Data(data) => {
                let flags = derive_flags(&data.booking, ctx);
                BookingRowResponse::Data {
                    row: data.clone(),
                    flags,
                    actions: available_actions(&flags),
                }
            }
            Row::Separator { label } => BookingRowResponse::Separator { label: *label },
        })
        .collect()
}

/// GET /api/v1/bookings
///
/// Lists one page of bookings the caller organizes or attends, grouped into
/// table rows with the actions available on each.
pub async fn list_bookings(
    State(state): State<AppState>,
    auth: UserAuth,
    Query(query): Query<ListBookingsQuery>,
) -> Result<Json<ListBookingsResponse>, ApiError> {
    let status = query.status.unwrap_or_default();
    let limit = clamp_page_size(
        query.limit,
        state.config.bookings.default_page_size,
        state.config.bookings.max_page_size,
    );
    let offset = query.offset.unwrap_or(0);
    validate_offset(offset)?;
    let tz = parse_utc_offset(query.time_zone.as_deref())?;

    let event_type_ids: Vec<i64> = parse_id_list("event_type_ids", query.event_type_ids.as_deref())?;
    let team_ids: Vec<Uuid> = parse_id_list("team_ids", query.team_ids.as_deref())?;
    let requested_user_ids: Vec<Uuid> = parse_id_list("user_ids", query.user_ids.as_deref())?;

    let membership_repo = MembershipRepository::new(state.pool.clone());
    let viewer_email = UserRepository::new(state.pool.clone())
        .find_email(auth.user_id)
        .await?;

    let user_ids = if requested_user_ids.is_empty() {
        Vec::new()
    } else {
        let visible =
            visible_user_filter(&membership_repo, auth.user_id, &requested_user_ids).await?;
        if visible.is_empty() {
            info!(user_id = %auth.user_id, "No requested organizers are visible");
            return Ok(Json(ListBookingsResponse {
                status,
                rows: Vec::new(),
                recurring_info: Vec::new(),
                total_count: 0,
                limit,
                offset,
            }));
        }
        visible
    };

    let mut organizer_ids = vec![auth.user_id];
    organizer_ids.extend(user_ids.iter().copied().filter(|id| *id != auth.user_id));

    let visibility = BookingVisibility {
        organizer_ids,
        attendee_email: viewer_email.clone(),
    };

    let booking_query = BookingQuery {
        limit,
        offset,
        filters: BookingFilters {
            status,
            event_type_ids,
            team_ids,
            user_ids,
            attendee_name: query.attendee_name,
            attendee_email: query.attendee_email,
            booking_uid: query.booking_uid,
            after_start_date: query.after_start_date,
            before_end_date: query.before_end_date,
        },
    };

    let now = Utc::now();
    let page = BookingRepository::new(state.pool.clone())
        .list(&visibility, &booking_query, now)
        .await?;

    let mut list = BookingListState::new(status);
    list.load(&page, &tz, now);

    let ctx = ActionContext {
        now,
        viewer_id: Some(auth.user_id),
        viewer_email: viewer_email.as_deref(),
        list_status: status,
    };
    let rows = row_responses(list.rows(), &ctx);

    metrics::record_bookings_listed(&status.to_string(), page.bookings.len());
    info!(
        user_id = %auth.user_id,
        status = %status,
        count = page.bookings.len(),
        total_count = page.total_count,
        "Listed bookings"
    );

    Ok(Json(ListBookingsResponse {
        status,
        rows,
        recurring_info: page.recurring_info,
        total_count: list.total_count(),
        limit,
        offset,
    }))
}

/// POST /api/v1/bookings/:booking_uid/no-show
///
/// Marks attendees of a booking that has started as no-shows, or clears the flag.
pub async fn mark_no_show(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(booking_uid): Path<String>,
    Json(request): Json<MarkNoShowRequest>,
) -> Result<Json<MarkNoShowResponse>, ApiError> {
    request.validate()?;

    let repo = BookingRepository::new(state.pool.clone());
    let membership_repo = MembershipRepository::new(state.pool.clone());

    let booking = repo.find_by_uid(&booking_uid).await?;
    let permission = booking_permission(&membership_repo, auth.user_id, booking.as_ref()).await?;
    check_no_show(booking.as_ref(), permission, &request.attendees, Utc::now())?;
    let booking = booking.ok_or_else(MutationError::booking_not_found)?;

    let attendees = repo.set_no_show(booking.id, &request.attendees).await?;

    metrics::record_no_show_update(attendees.len());
    info!(
        user_id = %auth.user_id,
        booking_id = booking.id,
        count = attendees.len(),
        "Updated attendee no-show flags"
    );

    Ok(Json(MarkNoShowResponse {
        booking_uid: booking.uid,
        attendees,
        message: "no_show_updated".to_string(),
    }))
}

/// PATCH /api/v1/bookings/:booking_id/location
///
/// Changes where a booking takes place, optionally through a conferencing
/// credential of the organizer.
pub async fn edit_location(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(booking_id): Path<i64>,
    Json(request): Json<EditLocationRequest>,
) -> Result<Json<EditLocationResponse>, ApiError> {
    request.validate()?;

    let repo = BookingRepository::new(state.pool.clone());
    let membership_repo = MembershipRepository::new(state.pool.clone());

    let booking = repo.find_by_id(booking_id).await?;
    let permission = booking_permission(&membership_repo, auth.user_id, booking.as_ref()).await?;

    let credential_found = match (request.credential_id, booking.as_ref()) {
        (Some(credential_id), Some(booking)) => {
            let owner_id = booking.user_id.unwrap_or(auth.user_id);
            Some(repo.credential_exists(credential_id, owner_id).await?)
        }
        _ => None,
    };

    check_location_edit(booking.as_ref(), permission, credential_found)?;

    if !repo.update_location(booking_id, &request.new_location).await? {
        return Err(MutationError::location_update_failed().into());
    }

    metrics::record_location_edit();
    info!(
        user_id = %auth.user_id,
        booking_id = booking_id,
        "Updated booking location"
    );

    Ok(Json(EditLocationResponse {
        booking_id,
        location: request.new_location,
        message: "location_updated".to_string(),
    }))
}
