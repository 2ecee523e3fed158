/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Registration, login and password update
/// - `users`: User reads and deletion
/// - `projects`: Project creation, listing and cascade deletion
/// - `members`: Membership creation and removal
/// - `expenses`: Expense recording, listing and deletion
pub mod auth;
pub mod expenses;
pub mod health;
pub mod members;
pub mod projects;
pub mod users;

use serde::Deserialize;

/// Offset/limit pagination query parameters shared by list endpoints
#[derive(Debug, Deserialize)]
pub struct Pagination {
    /// Number of rows to skip
    #[serde(default)]
    pub offset: i64,

    /// Maximum number of rows to return
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}
