/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /v1/auth/register` - Register a new user
/// - `POST /v1/auth/login` - Login and get a bearer token
/// - `PUT /v1/auth/password` - Replace the caller's password (authenticated)
///
/// Login deliberately returns the same generic error for an unknown email
/// and a wrong password, so callers cannot enumerate accounts.
use crate::{
    app::{AppState, AuthSubject},
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use splitbook_shared::{
    auth::{jwt, password},
    models::user::{CreateUser, User},
};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Plaintext password, hashed before storage
    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Signed bearer token
    pub access_token: String,

    /// Always "bearer"
    pub token_type: String,
}

/// Password update request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePasswordRequest {
    /// Current password, must verify against the stored hash
    pub current_password: String,

    /// Replacement password
    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub new_password: String,
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /v1/auth/register
/// Content-Type: application/json
///
/// {
///   "name": "Alice",
///   "email": "alice@example.com",
///   "password": "pw123"
/// }
/// ```
///
/// # Errors
///
/// - `422 Unprocessable Entity`: invalid email or empty field
/// - `409 Conflict`: email already registered
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<User>> {
    req.validate()?;

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            name: req.name,
            email: req.email,
            password_hash,
        },
    )
    .await?;

    // The password hash is skipped on serialization
    Ok(Json(user))
}

/// Login endpoint
///
/// Authenticates a user and returns a time-limited bearer token whose
/// subject is the user's email.
///
/// # Endpoint
///
/// ```text
/// POST /v1/auth/login
/// Content-Type: application/json
///
/// {
///   "email": "alice@example.com",
///   "password": "pw123"
/// }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: unknown email or wrong password (indistinguishable)
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    req.validate()?;

    // Same error for both failure modes: no account enumeration
    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    let claims = jwt::Claims::new(user.email, state.token_lifetime());
    let access_token = jwt::create_token(&claims, state.jwt_secret())?;

    Ok(Json(LoginResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

/// Password update endpoint
///
/// Replaces the stored hash for the authenticated user (the token subject)
/// after verifying the current password. Single-row update.
///
/// # Errors
///
/// - `404 Not Found`: token subject no longer exists
/// - `401 Unauthorized`: current password does not verify
pub async fn update_password(
    State(state): State<AppState>,
    Extension(AuthSubject(email)): Extension<AuthSubject>,
    Json(req): Json<UpdatePasswordRequest>,
) -> ApiResult<StatusCode> {
    req.validate()?;

    let user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let valid = password::verify_password(&req.current_password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    let new_hash = password::hash_password(&req.new_password)?;
    User::update_password(&state.db, &email, &new_hash).await?;

    Ok(StatusCode::NO_CONTENT)
}
