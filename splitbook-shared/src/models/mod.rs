/// Database models for Splitbook
///
/// This module contains the four entities and the consistency rules between
/// them. Every mutation keeps these rules intact:
///
/// - No membership or expense exists whose project does not exist
/// - At most one membership per (project_id, member_id) pair
/// - Deleting a project removes exactly its memberships and expenses
/// - Removing a membership removes exactly that member's expenses under
///   that project
///
/// # Reference edges and deletion policies
///
/// Each reference between entities carries an explicit policy applied at
/// this layer (not as database triggers):
///
/// | edge                        | on parent delete |
/// |-----------------------------|------------------|
/// | membership -> project       | cascade          |
/// | expense -> project          | cascade          |
/// | expense -> (project, member)| cascade          |
/// | membership -> user          | ignore           |
/// | expense -> user             | ignore           |
/// | project -> admin user       | ignore           |
///
/// "Ignore" means deleting a user leaves its references dangling. Callers
/// must not assume referential integrity for user edges after a user is
/// deleted.
///
/// The cascade edges to `projects` additionally carry a database foreign
/// key as a backstop: a writer that loses the race between its project
/// existence check and a concurrent project deletion hits the constraint
/// instead of inserting an orphan, and the violation is reported as
/// [`StoreError::NotFound`]. The user edges carry no constraint at all, so
/// user deletion is never blocked.
///
/// # Name snapshots
///
/// Memberships and expenses carry `project_name`/`member_name` copies taken
/// at the time the row was written. They are a read optimization and are
/// never synced when the source name changes; readers must tolerate stale
/// values.
///
/// # Example
///
/// ```no_run
/// use splitbook_shared::models::user::{CreateUser, User};
/// use splitbook_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(
///     &pool,
///     CreateUser {
///         name: "Alice".to_string(),
///         email: "alice@example.com".to_string(),
///         password_hash: "$argon2id$...".to_string(),
///     },
/// )
/// .await?;
/// # Ok(())
/// # }
/// ```
pub mod expense;
pub mod membership;
pub mod project;
pub mod user;

/// Error type for store operations
///
/// Every model method returns this; the API layer maps the variants onto
/// HTTP status codes (404, 409, 500/503).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A referenced entity does not exist
    #[error("{0} not found")]
    NotFound(&'static str),

    /// A uniqueness invariant would be violated
    #[error("{0}")]
    Conflict(String),

    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Maps a sqlx error from an insert to the domain variant its
    /// constraint stands for: unique violations become Conflict, foreign
    /// key violations become NotFound("Project"), anything else Database.
    ///
    /// The constraints are the last line of defense against a concurrent
    /// writer winning the race between the existence checks and the insert;
    /// the only foreign keys in the schema point at `projects`.
    pub(crate) fn from_insert(err: sqlx::Error, conflict_message: &str) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                StoreError::Conflict(conflict_message.to_string())
            }
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                StoreError::NotFound("Project")
            }
            _ => StoreError::Database(err),
        }
    }
}
