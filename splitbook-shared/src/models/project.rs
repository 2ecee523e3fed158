/// Project model and database operations
///
/// A project is owned by its admin (a user) and collects memberships and
/// expenses. Deleting a project cascades to both, atomically.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE projects (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     project_name VARCHAR(255) NOT NULL,
///     admin_id UUID NOT NULL,
///     admin_name VARCHAR(255),
///     start_date DATE NOT NULL,
///     end_date DATE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// `admin_name` is an optional snapshot of the admin's name at creation
/// time; it is not updated when the user renames themselves.
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::StoreError;

/// Project model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    /// Unique project ID (UUID v4)
    pub id: Uuid,

    /// Project name
    pub project_name: String,

    /// ID of the user who created/owns the project
    pub admin_id: Uuid,

    /// Snapshot of the admin's name at creation, if the caller supplied one
    pub admin_name: Option<String>,

    /// When the project starts
    pub start_date: NaiveDate,

    /// When the project ends, if bounded
    pub end_date: Option<NaiveDate>,

    /// When the row was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProject {
    pub project_name: String,
    pub admin_id: Uuid,
    pub admin_name: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

/// Row counts removed by a project deletion cascade
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ProjectCascade {
    /// Expenses deleted alongside the project
    pub expenses_removed: u64,

    /// Memberships deleted alongside the project
    pub memberships_removed: u64,
}

impl Project {
    /// Creates a new project
    ///
    /// The admin must exist; the check runs before the insert so a project
    /// can never be created against a missing user.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if `admin_id` does not reference an
    /// existing user.
    pub async fn create(pool: &PgPool, data: CreateProject) -> Result<Self, StoreError> {
        let admin_exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
            .bind(data.admin_id)
            .fetch_one(pool)
            .await?;

        if !admin_exists {
            return Err(StoreError::NotFound("User"));
        }

        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (project_name, admin_id, admin_name, start_date, end_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, project_name, admin_id, admin_name, start_date, end_date, created_at
            "#,
        )
        .bind(data.project_name)
        .bind(data.admin_id)
        .bind(data.admin_name)
        .bind(data.start_date)
        .bind(data.end_date)
        .fetch_one(pool)
        .await?;

        Ok(project)
    }

    /// Finds a project by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, StoreError> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, project_name, admin_id, admin_name, start_date, end_date, created_at
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(project)
    }

    /// Lists projects with offset/limit pagination, newest first
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Self>, StoreError> {
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, project_name, admin_id, admin_name, start_date, end_date, created_at
            FROM projects
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(projects)
    }

    /// Lists the projects a user belongs to, via their memberships
    pub async fn list_for_member(pool: &PgPool, member_id: Uuid) -> Result<Vec<Self>, StoreError> {
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT p.id, p.project_name, p.admin_id, p.admin_name, p.start_date, p.end_date,
                   p.created_at
            FROM projects p
            JOIN memberships m ON m.project_id = p.id
            WHERE m.member_id = $1
            ORDER BY p.created_at DESC
            "#,
        )
        .bind(member_id)
        .fetch_all(pool)
        .await?;

        Ok(projects)
    }

    /// Deletes a project and everything under it
    ///
    /// Runs as a single transaction: all expenses with this project_id, then
    /// all memberships, then the project row. No reader ever observes the
    /// project gone while its children remain (or the reverse).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the project does not exist; the
    /// transaction rolls back and nothing is removed.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<ProjectCascade, StoreError> {
        let mut tx = pool.begin().await?;

        let expenses = sqlx::query("DELETE FROM expenses WHERE project_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let memberships = sqlx::query("DELETE FROM memberships WHERE project_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let project = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if project.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(StoreError::NotFound("Project"));
        }

        tx.commit().await?;

        Ok(ProjectCascade {
            expenses_removed: expenses.rows_affected(),
            memberships_removed: memberships.rows_affected(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_project_struct() {
        let create = CreateProject {
            project_name: "Trip".to_string(),
            admin_id: Uuid::new_v4(),
            admin_name: Some("Alice".to_string()),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: None,
        };

        assert_eq!(create.project_name, "Trip");
        assert!(create.end_date.is_none());
    }

    // Cascade behavior is covered by integration tests in tests/store_tests.rs
}
