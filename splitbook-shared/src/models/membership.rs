/// Membership model and database operations
///
/// A membership associates one user with one project under a role string.
/// Identity is the composite (project_id, member_id) pair; the composite
/// primary key guarantees at most one membership per pair even when two
/// writers race past the duplicate check.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE memberships (
///     project_id UUID NOT NULL REFERENCES projects (id),
///     member_id UUID NOT NULL,
///     project_name VARCHAR(255) NOT NULL,
///     member_name VARCHAR(255) NOT NULL,
///     member_role VARCHAR(50) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (project_id, member_id)
/// );
/// ```
///
/// `project_name` and `member_name` are snapshots taken when the membership
/// is created and are never synced afterwards.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::StoreError;

/// Membership model keyed by (project_id, member_id)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Membership {
    /// Project the member belongs to
    pub project_id: Uuid,

    /// User who is the member
    pub member_id: Uuid,

    /// Project name snapshot at creation time
    pub project_name: String,

    /// Member name snapshot at creation time
    pub member_name: String,

    /// Free-form role string (e.g. "owner", "member")
    pub member_role: String,

    /// When the membership was created
    pub created_at: DateTime<Utc>,
}

/// Input for adding a member to a project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMembership {
    pub project_id: Uuid,
    pub member_id: Uuid,
    pub member_role: String,
}

impl Membership {
    /// Adds a user to a project
    ///
    /// Resolves both the project and the user first, snapshotting their
    /// current names into the new row.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`] if the project or user does not exist
    /// - [`StoreError::Conflict`] if a membership already exists for the
    ///   (project_id, member_id) pair
    pub async fn create(pool: &PgPool, data: CreateMembership) -> Result<Self, StoreError> {
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

        let membership = sqlx::query_as::<_, Membership>(
            r#"
            INSERT INTO memberships (project_id, member_id, project_name, member_name, member_role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING project_id, member_id, project_name, member_name, member_role, created_at
            "#,
        )
        .bind(data.project_id)
        .bind(data.member_id)
        .bind(project_name)
        .bind(member_name)
        .bind(data.member_role)
        .fetch_one(pool)
        .await
        .map_err(|e| StoreError::from_insert(e, "Member is already assigned to this project"))?;

        Ok(membership)
    }

    /// Finds a specific membership by its composite key
    pub async fn find(
        pool: &PgPool,
        project_id: Uuid,
        member_id: Uuid,
    ) -> Result<Option<Self>, StoreError> {
        let membership = sqlx::query_as::<_, Membership>(
            r#"
            SELECT project_id, member_id, project_name, member_name, member_role, created_at
            FROM memberships
            WHERE project_id = $1 AND member_id = $2
            "#,
        )
        .bind(project_id)
        .bind(member_id)
        .fetch_optional(pool)
        .await?;

        Ok(membership)
    }

    /// Lists all memberships of a project
    pub async fn list_by_project(pool: &PgPool, project_id: Uuid) -> Result<Vec<Self>, StoreError> {
        let memberships = sqlx::query_as::<_, Membership>(
            r#"
            SELECT project_id, member_id, project_name, member_name, member_role, created_at
            FROM memberships
            WHERE project_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        Ok(memberships)
    }

    /// Removes a member from a project
    ///
    /// Runs as a single transaction: first all expenses under the project
    /// attributed to this member, then the membership row itself. Expenses
    /// the member has under other projects, and other members' expenses
    /// under this project, are untouched.
    ///
    /// Returns the number of expenses removed alongside the membership.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no membership exists for the
    /// pair; the transaction rolls back and no expense is removed.
    pub async fn remove(
        pool: &PgPool,
        project_id: Uuid,
        member_id: Uuid,
    ) -> Result<u64, StoreError> {
        let mut tx = pool.begin().await?;

        let expenses = sqlx::query("DELETE FROM expenses WHERE project_id = $1 AND member_id = $2")
            .bind(project_id)
            .bind(member_id)
            .execute(&mut *tx)
            .await?;

        let membership =
            sqlx::query("DELETE FROM memberships WHERE project_id = $1 AND member_id = $2")
                .bind(project_id)
                .bind(member_id)
                .execute(&mut *tx)
                .await?;

        if membership.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(StoreError::NotFound("Membership"));
        }

        tx.commit().await?;

        Ok(expenses.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_membership_struct() {
        let create = CreateMembership {
            project_id: Uuid::new_v4(),
            member_id: Uuid::new_v4(),
            member_role: "owner".to_string(),
        };

        assert_eq!(create.member_role, "owner");
    }

    // Uniqueness and cascade behavior are covered in tests/store_tests.rs
}
