/// User endpoints
///
/// # Endpoints
///
/// - `GET /v1/users` - List users (paginated)
/// - `GET /v1/users/email/:email` - Look up a user by email
/// - `GET /v1/users/:id/projects` - Projects the user is a member of
/// - `DELETE /v1/users/:id` - Delete a user (authenticated)
/// - `DELETE /v1/users` - Delete all users (authenticated)
///
/// User deletion does NOT cascade: projects, memberships and expenses that
/// reference the user are left dangling.
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::Pagination,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use splitbook_shared::models::{project::Project, user::User};
use uuid::Uuid;

/// Response for bulk user deletion
#[derive(Debug, Serialize)]
pub struct DeleteAllUsersResponse {
    /// Number of user rows removed
    pub deleted: u64,
}

/// Lists users with offset/limit pagination
pub async fn list_users(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> ApiResult<Json<Vec<User>>> {
    let users = User::list(&state.db, pagination.limit, pagination.offset).await?;
    Ok(Json(users))
}

/// Looks up a single user by email
///
/// # Errors
///
/// - `404 Not Found`: no user with that email
pub async fn get_user_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> ApiResult<Json<User>> {
    let user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}

/// Lists the projects a user belongs to (via memberships)
pub async fn projects_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Project>>> {
    let projects = Project::list_for_member(&state.db, user_id).await?;
    Ok(Json(projects))
}

/// Deletes a user
///
/// Removes only the user row; anything referencing the user dangles
/// afterwards.
///
/// # Errors
///
/// - `404 Not Found`: user does not exist
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    User::delete(&state.db, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Deletes all users, returning the number removed
pub async fn delete_all_users(
    State(state): State<AppState>,
) -> ApiResult<Json<DeleteAllUsersResponse>> {
    let deleted = User::delete_all(&state.db).await?;
    Ok(Json(DeleteAllUsersResponse { deleted }))
}
