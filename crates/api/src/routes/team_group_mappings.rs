//! Directory group to team mapping endpoints.
//!
//! Every operation passes the team group mapping guard first.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use domain::models::{
    CreateTeamGroupMappingRequest, ListTeamGroupMappingsResponse, TeamGroupMapping,
};
use domain::services::{authorize, AuthorizedMapping, GuardError};
use persistence::repositories::{MembershipRepository, TeamGroupMappingRepository, TeamRepository};
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::middleware::metrics;

async fn guard(
    state: &AppState,
    user_id: Uuid,
    organization_id: Uuid,
    team_id: Option<Uuid>,
) -> Result<AuthorizedMapping, ApiError> {
    let access = MembershipRepository::new(state.pool.clone());
    let teams = TeamRepository::new(state.pool.clone());

    authorize(&access, &teams, user_id, Some(organization_id), team_id)
        .await
        .map_err(|e| {
            if let GuardError::BadRequest(message) = &e {
                metrics::record_guard_rejection("bad_request");
                warn!(
                    user_id = %user_id,
                    organization_id = %organization_id,
                    reason = %message,
                    "Team group mapping request rejected"
                );
            }
            ApiError::from(e)
        })
}

/// POST /api/v1/organizations/:org_id/team-group-mappings
pub async fn create_mapping(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(org_id): Path<Uuid>,
    Json(request): Json<CreateTeamGroupMappingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let authorized = guard(&state, auth.user_id, org_id, Some(request.team_id)).await?;

    let repo = TeamGroupMappingRepository::new(state.pool.clone());
    let mapping: TeamGroupMapping = repo
        .create(
            authorized.organization_id,
            request.team_id,
            &request.directory_id,
            &request.group_name,
        )
        .await
        .map_err(|e| match ApiError::from(e) {
            ApiError::Conflict(_) => ApiError::Conflict(format!(
                "Group '{}' is already mapped to this team",
                request.group_name
            )),
            other => other,
        })?
        .into();

    info!(
        user_id = %auth.user_id,
        organization_id = %mapping.organization_id,
        team_id = %mapping.team_id,
        mapping_id = mapping.id,
        "Created team group mapping"
    );

    Ok((StatusCode::CREATED, Json(mapping)))
}

/// GET /api/v1/organizations/:org_id/team-group-mappings
pub async fn list_mappings(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(org_id): Path<Uuid>,
) -> Result<Json<ListTeamGroupMappingsResponse>, ApiError> {
    let authorized = guard(&state, auth.user_id, org_id, None).await?;

    let repo = TeamGroupMappingRepository::new(state.pool.clone());
    let data: Vec<TeamGroupMapping> = repo
        .list_by_organization(authorized.organization_id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(ListTeamGroupMappingsResponse { data }))
}

/// GET /api/v1/organizations/:org_id/team-group-mappings/:mapping_id
pub async fn get_mapping(
    State(state): State<AppState>,
    auth: UserAuth,
    Path((org_id, mapping_id)): Path<(Uuid, i64)>,
) -> Result<Json<TeamGroupMapping>, ApiError> {
    let authorized = guard(&state, auth.user_id, org_id, None).await?;

    let repo = TeamGroupMappingRepository::new(state.pool.clone());
    let mapping = repo
        .find_by_id(authorized.organization_id, mapping_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Team group mapping not found".to_string()))?;

    Ok(Json(mapping.into()))
}

/// DELETE /api/v1/organizations/:org_id/team-group-mappings/:mapping_id
pub async fn delete_mapping(
    State(state): State<AppState>,
    auth: UserAuth,
    Path((org_id, mapping_id)): Path<(Uuid, i64)>,
) -> Result<StatusCode, ApiError> {
    let authorized = guard(&state, auth.user_id, org_id, None).await?;

    let repo = TeamGroupMappingRepository::new(state.pool.clone());
    if !repo.delete(authorized.organization_id, mapping_id).await? {
        return Err(ApiError::NotFound("Team group mapping not found".to_string()));
    }

    info!(
        user_id = %auth.user_id,
        organization_id = %authorized.organization_id,
        mapping_id = mapping_id,
        "Deleted team group mapping"
    );

    Ok(StatusCode::NO_CONTENT)
}
