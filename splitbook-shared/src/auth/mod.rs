/// Authentication utilities
///
/// This module provides the credential primitives for Splitbook:
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: JWT token generation and validation
///
/// # Security
///
/// - **Password hashing**: Argon2id with per-call random salt; the PHC
///   string embeds algorithm, cost and salt, so verification needs only the
///   stored string and the candidate plaintext
/// - **Tokens**: HS256-signed JWTs with a fixed expiry (30 minutes by
///   default); expiry is the only lifetime bound, there is no revocation
///
/// # Example
///
/// ```no_run
/// use splitbook_shared::auth::password::{hash_password, verify_password};
/// use splitbook_shared::auth::jwt::{create_token, validate_token, Claims};
/// use chrono::Duration;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let claims = Claims::new("alice@example.com".to_string(), Duration::minutes(30));
/// let token = create_token(&claims, "secret-key-at-least-32-bytes-long!!")?;
/// # Ok(())
/// # }
/// ```
pub mod jwt;
pub mod password;
