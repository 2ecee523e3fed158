/// Expense model and database operations
///
/// An expense belongs to a project and is attributed to a user. Recording
/// one does NOT require a membership between the two: a non-member can have
/// expenses recorded against a project. Removing the (project, member)
/// membership later sweeps those expenses away, and so does deleting the
/// project.
///
/// Amounts are positive integers in the smallest currency unit.
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::StoreError;

/// Expense model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Expense {
    pub id: Uuid,
    pub project_id: Uuid,
    pub member_id: Uuid,
    pub expense_name: String,

    /// Amount in the smallest currency unit, always > 0
    pub amount: i64,

    pub expense_date: Option<NaiveDate>,

    /// Project name snapshot at creation time
    pub project_name: String,

    /// Member name snapshot at creation time
    pub member_name: String,

    pub expense_type: String,
    pub expense_detail: Option<String>,
    pub expense_proof: Option<String>,
    pub expense_status: String,
    pub created_at: DateTime<Utc>,
}

/// Input for recording a new expense
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateExpense {
    pub project_id: Uuid,
    pub member_id: Uuid,
    pub expense_name: String,
    pub amount: i64,
    pub expense_date: Option<NaiveDate>,
    pub expense_type: String,
    pub expense_detail: Option<String>,
    pub expense_proof: Option<String>,
    pub expense_status: String,
}

impl Expense {
    /// Records a new expense
    ///
    /// Resolves the project and the user (snapshotting their names) but
    /// deliberately does not check for a membership between them.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the project or user does not
    /// exist. Amount validation (> 0) happens at the request boundary, with
    /// the schema CHECK constraint as backstop.
    pub async fn create(pool: &PgPool, data: CreateExpense) -> Result<Self, StoreError> {
        let project_name: Option<String> =
            sqlx::query_scalar("SELECT project_name FROM projects WHERE id = $1")
                .bind(data.project_id)
                .fetch_optional(pool)
                .await?;
        let project_name = project_name.ok_or(StoreError::NotFound("Project"))?;

        let member_name: Option<String> = sqlx::query_scalar("SELECT name FROM users WHERE id = $1")
            .bind(data.member_id)
            .fetch_optional(pool)
            .await?;
        let member_name = member_name.ok_or(StoreError::NotFound("User"))?;

        let expense = sqlx::query_as::<_, Expense>(
            r#"
            INSERT INTO expenses (project_id, member_id, expense_name, amount, expense_date,
                                  project_name, member_name, expense_type, expense_detail,
                                  expense_proof, expense_status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id, project_id, member_id, expense_name, amount, expense_date,
                      project_name, member_name, expense_type, expense_detail,
                      expense_proof, expense_status, created_at
            "#,
        )
        .bind(data.project_id)
        .bind(data.member_id)
        .bind(data.expense_name)
        .bind(data.amount)
        .bind(data.expense_date)
        .bind(project_name)
        .bind(member_name)
        .bind(data.expense_type)
        .bind(data.expense_detail)
        .bind(data.expense_proof)
        .bind(data.expense_status)
        .fetch_one(pool)
        .await
        .map_err(|e| match &e {
            // A concurrent DeleteProject can win the race against the
            // existence check above; the foreign key turns that into
            // NotFound instead of an orphaned row.
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                StoreError::NotFound("Project")
            }
            _ => StoreError::Database(e),
        })?;

        Ok(expense)
    }

    /// Finds an expense by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, StoreError> {
        let expense = sqlx::query_as::<_, Expense>(
            r#"
            SELECT id, project_id, member_id, expense_name, amount, expense_date,
                   project_name, member_name, expense_type, expense_detail,
                   expense_proof, expense_status, created_at
            FROM expenses
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(expense)
    }

    /// Lists expenses, optionally filtered to one project, newest first
    pub async fn list(
        pool: &PgPool,
        project_id: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, StoreError> {
        let expenses = sqlx::query_as::<_, Expense>(
            r#"
            SELECT id, project_id, member_id, expense_name, amount, expense_date,
                   project_name, member_name, expense_type, expense_detail,
                   expense_proof, expense_status, created_at
            FROM expenses
            WHERE ($1::uuid IS NULL OR project_id = $1)
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(project_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(expenses)
    }

    /// Deletes a single expense by ID
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the expense does not exist.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("Expense"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_expense_struct() {
        let create = CreateExpense {
            project_id: Uuid::new_v4(),
            member_id: Uuid::new_v4(),
            expense_name: "Taxi".to_string(),
            amount: 1500,
            expense_date: None,
            expense_type: "travel".to_string(),
            expense_detail: None,
            expense_proof: None,
            expense_status: "pending".to_string(),
        };

        assert_eq!(create.amount, 1500);
        assert_eq!(create.expense_status, "pending");
    }
}
