/// User model and database operations
///
/// Users are the identities that own projects, join them as members, and
/// record expenses. Passwords are stored as Argon2id hashes, never in
/// plaintext, and the hash is never serialized back to callers.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     email VARCHAR(255) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Deletion
///
/// Deleting a user removes only the user row. Projects, memberships and
/// expenses that reference the user are left untouched and dangle; see the
/// edge-policy table in [`crate::models`].
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::StoreError;

/// User model representing a registered identity
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Email address, unique across all users
    pub email: String,

    /// Argon2id password hash (PHC string format)
    ///
    /// Never leaves the process: skipped on serialization so no response
    /// body can carry it.
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Display name
    pub name: String,

    /// Email address
    pub email: String,

    /// Argon2id password hash (NOT the plaintext password)
    pub password_hash: String,
}

impl User {
    /// Creates a new user in the database
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] if the email already belongs to a
    /// user, [`StoreError::Database`] on connection failure.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, password_hash, created_at
            "#,
        )
        .bind(data.name)
        .bind(data.email)
        .bind(data.password_hash)
        .fetch_one(pool)
        .await
        .map_err(|e| StoreError::from_insert(e, "Email already registered"))?;

        Ok(user)
    }

    /// Finds a user by ID
    ///
    /// Returns the user if found, None otherwise.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by email address
    ///
    /// Returns the user if found, None otherwise.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Replaces the stored password hash for a user
    ///
    /// Single-row update; the caller is responsible for verifying the
    /// current password first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no user has that email.
    pub async fn update_password(
        pool: &PgPool,
        email: &str,
        new_password_hash: &str,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $2
            WHERE email = $1
            "#,
        )
        .bind(email)
        .bind(new_password_hash)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("User"));
        }

        Ok(())
    }

    /// Deletes a user by ID
    ///
    /// Removes only the user row. Projects, memberships and expenses
    /// referencing the user are deliberately left in place ("ignore"
    /// policy), so they dangle afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the user does not exist.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("User"));
        }

        Ok(())
    }

    /// Deletes all users, returning the number removed
    ///
    /// Same non-cascading behavior as [`User::delete`], applied to every
    /// row.
    pub async fn delete_all(pool: &PgPool) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM users").execute(pool).await?;

        Ok(result.rows_affected())
    }

    /// Lists users with offset/limit pagination, newest first
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Self>, StoreError> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, created_at
            FROM users
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(users)
    }
}
