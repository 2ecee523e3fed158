/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - Test database setup and migrations
/// - Router construction with a fixed test configuration
/// - Registration/login helpers
/// - Request and response body helpers
///
/// Tests using this module require a running PostgreSQL instance and skip
/// themselves when DATABASE_URL is not set.
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use splitbook_api::app::{build_router, AppState};
use splitbook_api::config::{ApiConfig, Config, DatabaseConfig, JwtConfig};
use sqlx::PgPool;
use tower::Service as _;
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "integration-test-secret-key-at-least-32-bytes";

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: Router,
    pub config: Config,
}

impl TestContext {
    /// Creates a new test context, or None when no database is configured
    pub async fn new() -> Option<Self> {
        let url = match std::env::var("DATABASE_URL") {
            Ok(url) => url,
            Err(_) => {
                eprintln!("DATABASE_URL not set, skipping integration test");
                return None;
            }
        };

        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec!["*".to_string()],
            },
            database: DatabaseConfig {
                url: url.clone(),
                max_connections: 5,
            },
            jwt: JwtConfig {
                secret: TEST_JWT_SECRET.to_string(),
                token_lifetime_minutes: 30,
            },
        };

        let db = PgPool::connect(&url).await.expect("connect to test database");

        // Path relative to this crate's Cargo.toml
        sqlx::migrate!("../splitbook-shared/migrations")
            .run(&db)
            .await
            .expect("run migrations");

        let state = AppState::new(db.clone(), config.clone());
        let app = build_router(state);

        Some(TestContext { db, app, config })
    }

    /// Sends a request through the router
    pub async fn send(&self, request: Request<Body>) -> Response<axum::body::Body> {
        self.app
            .clone()
            .call(request)
            .await
            .expect("router call is infallible")
    }

    /// Registers a user with a unique email, returning (id, email, password)
    pub async fn register_user(&self, name: &str) -> (Uuid, String, String) {
        let email = format!("{}-{}@example.com", name.to_lowercase(), Uuid::new_v4());
        let password = "correct horse battery staple".to_string();

        let response = self
            .send(json_request(
                "POST",
                "/v1/auth/register",
                None,
                Some(serde_json::json!({
                    "name": name,
                    "email": email,
                    "password": password,
                })),
            ))
            .await;
        assert_eq!(response.status(), 200, "registration failed");

        let body = body_json(response).await;
        let id = body["id"]
            .as_str()
            .and_then(|s| s.parse().ok())
            .expect("user id in response");

        (id, email, password)
    }

    /// Logs in and returns the bearer token
    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .send(json_request(
                "POST",
                "/v1/auth/login",
                None,
                Some(serde_json::json!({
                    "email": email,
                    "password": password,
                })),
            ))
            .await;
        assert_eq!(response.status(), 200, "login failed");

        let body = body_json(response).await;
        body["access_token"]
            .as_str()
            .expect("access_token in response")
            .to_string()
    }
}

/// Builds a request with an optional bearer token and JSON body
pub fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }

    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    };

    request.expect("valid test request")
}

/// Collects a response body as JSON
pub async fn body_json(response: Response<axum::body::Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body");
    serde_json::from_slice(&bytes).expect("JSON response body")
}
