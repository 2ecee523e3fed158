/// Expense endpoints
///
/// # Endpoints
///
/// - `POST /v1/expenses` - Record an expense (authenticated)
/// - `GET /v1/expenses` - List expenses, optionally filtered by project
/// - `DELETE /v1/expenses/:id` - Delete a single expense (authenticated)
use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use splitbook_shared::models::expense::{CreateExpense, Expense};
use uuid::Uuid;
use validator::Validate;

/// Expense creation request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateExpenseRequest {
    /// Project the expense belongs to; must exist
    pub project_id: Uuid,

    /// User the expense is attributed to; must exist, need not be a member
    pub member_id: Uuid,

    #[validate(length(min = 1, max = 255, message = "Expense name must be 1-255 characters"))]
    pub expense_name: String,

    /// Amount in the smallest currency unit; must be positive
    #[validate(range(min = 1, message = "Amount must be positive"))]
    pub amount: i64,

    pub expense_date: Option<NaiveDate>,

    #[validate(length(min = 1, max = 100, message = "Expense type must be 1-100 characters"))]
    pub expense_type: String,

    pub expense_detail: Option<String>,
    pub expense_proof: Option<String>,

    #[validate(length(min = 1, max = 50, message = "Expense status must be 1-50 characters"))]
    pub expense_status: String,
}

/// Query parameters for listing expenses
#[derive(Debug, Deserialize)]
pub struct ExpenseQuery {
    /// Restrict to one project
    pub project_id: Option<Uuid>,

    #[serde(default)]
    pub offset: i64,

    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}

/// Records a new expense
///
/// Snapshots the current project and user names into the row. A membership
/// between the project and the user is NOT required.
///
/// # Errors
///
/// - `422 Unprocessable Entity`: validation failed (non-positive amount)
/// - `404 Not Found`: project or user does not exist
pub async fn create_expense(
    State(state): State<AppState>,
    Json(req): Json<CreateExpenseRequest>,
) -> ApiResult<Json<Expense>> {
    req.validate()?;

    let expense = Expense::create(
        &state.db,
        CreateExpense {
            project_id: req.project_id,
            member_id: req.member_id,
            expense_name: req.expense_name,
            amount: req.amount,
            expense_date: req.expense_date,
            expense_type: req.expense_type,
            expense_detail: req.expense_detail,
            expense_proof: req.expense_proof,
            expense_status: req.expense_status,
        },
    )
    .await?;

    Ok(Json(expense))
}

/// Lists expenses, optionally filtered to one project
pub async fn list_expenses(
    State(state): State<AppState>,
    Query(query): Query<ExpenseQuery>,
) -> ApiResult<Json<Vec<Expense>>> {
    let expenses = Expense::list(&state.db, query.project_id, query.limit, query.offset).await?;
    Ok(Json(expenses))
}

/// Deletes a single expense
///
/// # Errors
///
/// - `404 Not Found`: expense does not exist
pub async fn delete_expense(
    State(state): State<AppState>,
    Path(expense_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    Expense::delete(&state.db, expense_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
