//! Organization membership endpoints.

use axum::{
    extract::{Query, State},
    Json,
};
use domain::models::{AccessibleUsersQuery, AccessibleUsersResponse};
use domain::services::{resolve_accessible_users, resolve_all_organization_members};
use persistence::repositories::MembershipRepository;
use shared::validation::parse_id_list;
use tracing::info;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

/// GET /api/v1/organizations/accessible-users?user_ids=a,b,c
///
/// Returns the subset of `user_ids` the caller may act on as an organization
/// admin. Callers without admin scope get an empty list.
pub async fn accessible_users(
    State(state): State<AppState>,
    auth: UserAuth,
    Query(query): Query<AccessibleUsersQuery>,
) -> Result<Json<AccessibleUsersResponse>, ApiError> {
    let candidates: Vec<Uuid> = parse_id_list("user_ids", query.user_ids.as_deref())?;

    let repo = MembershipRepository::new(state.pool.clone());
    let user_ids = resolve_accessible_users(&repo, auth.user_id, &candidates).await?;

    info!(
        user_id = %auth.user_id,
        requested = candidates.len(),
        accessible = user_ids.len(),
        "Resolved accessible users"
    );

    Ok(Json(AccessibleUsersResponse { user_ids }))
}

/// GET /api/v1/organizations/members
///
/// Returns every accepted member of the organization the caller administers.
pub async fn organization_members(
    State(state): State<AppState>,
    auth: UserAuth,
) -> Result<Json<AccessibleUsersResponse>, ApiError> {
    let repo = MembershipRepository::new(state.pool.clone());
    let user_ids = resolve_all_organization_members(&repo, auth.user_id).await?;

    info!(
        user_id = %auth.user_id,
        count = user_ids.len(),
        "Resolved organization members"
    );

    Ok(Json(AccessibleUsersResponse { user_ids }))
}
