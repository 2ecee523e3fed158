/// Membership endpoints
///
/// # Endpoints
///
/// - `POST /v1/members` - Add a member to a project (authenticated)
/// - `DELETE /v1/members/:project_id/:member_id` - Remove a member and that
///   member's expenses under the project, atomically (authenticated)
use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use splitbook_shared::models::membership::{CreateMembership, Membership};
use uuid::Uuid;
use validator::Validate;

/// Add-member request
#[derive(Debug, Deserialize, Validate)]
pub struct AddMemberRequest {
    /// Project to add the member to; must exist
    pub project_id: Uuid,

    /// User to add; must exist
    pub member_id: Uuid,

    /// Role string stored verbatim
    #[validate(length(min = 1, max = 50, message = "Role must be 1-50 characters"))]
    pub member_role: String,
}

/// Remove-member response
#[derive(Debug, Serialize)]
pub struct RemoveMemberResponse {
    /// Expenses removed alongside the membership
    pub expenses_removed: u64,
}

/// Adds a user to a project
///
/// Snapshots the current project and user names into the membership row.
///
/// # Errors
///
/// - `422 Unprocessable Entity`: validation failed
/// - `404 Not Found`: project or user does not exist
/// - `409 Conflict`: the user is already a member of the project
pub async fn add_member(
    State(state): State<AppState>,
    Json(req): Json<AddMemberRequest>,
) -> ApiResult<Json<Membership>> {
    req.validate()?;

    let membership = Membership::create(
        &state.db,
        CreateMembership {
            project_id: req.project_id,
            member_id: req.member_id,
            member_role: req.member_role,
        },
    )
    .await?;

    Ok(Json(membership))
}

/// Removes a member from a project
///
/// The member's expenses under this project go with the membership, in one
/// transaction; their expenses under other projects are untouched.
///
/// # Errors
///
/// - `404 Not Found`: no membership for the (project, member) pair
pub async fn remove_member(
    State(state): State<AppState>,
    Path((project_id, member_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<RemoveMemberResponse>> {
    let expenses_removed = Membership::remove(&state.db, project_id, member_id).await?;
    Ok(Json(RemoveMemberResponse { expenses_removed }))
}
