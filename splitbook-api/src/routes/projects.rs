/// Project endpoints
///
/// # Endpoints
///
/// - `POST /v1/projects` - Create a project (authenticated)
/// - `GET /v1/projects` - List projects (paginated)
/// - `DELETE /v1/projects/:id` - Delete a project and its memberships and
///   expenses in one transaction (authenticated)
/// - `GET /v1/projects/:id/members` - List a project's memberships
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::Pagination,
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use splitbook_shared::models::{
    membership::Membership,
    project::{CreateProject, Project, ProjectCascade},
};
use uuid::Uuid;
use validator::Validate;

/// Project creation request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    /// Project name
    #[validate(length(min = 1, max = 255, message = "Project name must be 1-255 characters"))]
    pub project_name: String,

    /// User who owns the project; must exist
    pub admin_id: Uuid,

    /// Optional snapshot of the admin's name
    #[validate(length(max = 255, message = "Admin name must be at most 255 characters"))]
    pub admin_name: Option<String>,

    /// When the project starts
    pub start_date: NaiveDate,

    /// When the project ends, if bounded
    pub end_date: Option<NaiveDate>,
}

/// Creates a new project
///
/// # Errors
///
/// - `422 Unprocessable Entity`: validation failed
/// - `404 Not Found`: admin_id does not reference an existing user
pub async fn create_project(
    State(state): State<AppState>,
    Json(req): Json<CreateProjectRequest>,
) -> ApiResult<Json<Project>> {
    req.validate()?;

    let project = Project::create(
        &state.db,
        CreateProject {
            project_name: req.project_name,
            admin_id: req.admin_id,
            admin_name: req.admin_name,
            start_date: req.start_date,
            end_date: req.end_date,
        },
    )
    .await?;

    Ok(Json(project))
}

/// Lists projects with offset/limit pagination
pub async fn list_projects(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> ApiResult<Json<Vec<Project>>> {
    let projects = Project::list(&state.db, pagination.limit, pagination.offset).await?;
    Ok(Json(projects))
}

/// Deletes a project and everything under it
///
/// All expenses and memberships of the project go with it, atomically.
/// Responds with the removed row counts.
///
/// # Errors
///
/// - `404 Not Found`: project does not exist (nothing is removed)
pub async fn delete_project(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Json<ProjectCascade>> {
    let cascade = Project::delete(&state.db, project_id).await?;
    Ok(Json(cascade))
}

/// Lists the memberships of a project
///
/// # Errors
///
/// - `404 Not Found`: the project itself does not exist
pub async fn members_of_project(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Membership>>> {
    Project::find_by_id(&state.db, project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    let members = Membership::list_by_project(&state.db, project_id).await?;
    Ok(Json(members))
}
