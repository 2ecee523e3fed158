//! # Splitbook Shared Library
//!
//! This crate contains the data layer and authentication primitives used by
//! the Splitbook API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models and the consistency rules between them
//! - `auth`: Password hashing and JWT token utilities
//! - `db`: Connection pooling and migrations

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the Splitbook shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
