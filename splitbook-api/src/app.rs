/// Application state and router builder
///
/// This module defines the shared application state and provides a function
/// to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use splitbook_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = splitbook_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```
use crate::config::Config;
use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{delete, get, post, put},
    Router,
};
use chrono::Duration;
use splitbook_shared::auth::jwt;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning. The signing secret is read-only
/// after initialization.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets the JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }

    /// Gets the configured bearer-token lifetime
    pub fn token_lifetime(&self) -> Duration {
        Duration::minutes(self.config.jwt.token_lifetime_minutes)
    }
}

/// Subject of a validated bearer token (the user's email)
///
/// Injected into request extensions by the JWT middleware so protected
/// handlers can identify the caller.
#[derive(Debug, Clone)]
pub struct AuthSubject(pub String);

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                                 # Health check (public)
/// └── /v1/
///     ├── POST   /auth/register               # public
///     ├── POST   /auth/login                  # public
///     ├── PUT    /auth/password               # bearer
///     ├── GET    /users                       # public
///     ├── GET    /users/email/:email          # public
///     ├── GET    /users/:id/projects          # public
///     ├── DELETE /users/:id                   # bearer
///     ├── DELETE /users                       # bearer
///     ├── GET    /projects                    # public
///     ├── POST   /projects                    # bearer
///     ├── DELETE /projects/:id                # bearer
///     ├── GET    /projects/:id/members        # public
///     ├── POST   /members                     # bearer
///     ├── DELETE /members/:project_id/:member_id  # bearer
///     ├── GET    /expenses                    # public
///     ├── POST   /expenses                    # bearer
///     └── DELETE /expenses/:id                # bearer
/// ```
///
/// Every mutating route other than register/login sits behind the JWT
/// middleware; read routes are open, matching the original service.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Public routes: registration, login, and all reads
    let public_routes = Router::new()
        .route("/auth/register", post(routes::auth::register))
        .route("/auth/login", post(routes::auth::login))
        .route("/users", get(routes::users::list_users))
        .route("/users/email/:email", get(routes::users::get_user_by_email))
        .route("/users/:id/projects", get(routes::users::projects_for_user))
        .route("/projects", get(routes::projects::list_projects))
        .route(
            "/projects/:id/members",
            get(routes::projects::members_of_project),
        )
        .route("/expenses", get(routes::expenses::list_expenses));

    // Mutating routes require a valid bearer token
    let protected_routes = Router::new()
        .route("/auth/password", put(routes::auth::update_password))
        .route("/users/:id", delete(routes::users::delete_user))
        .route("/users", delete(routes::users::delete_all_users))
        .route("/projects", post(routes::projects::create_project))
        .route("/projects/:id", delete(routes::projects::delete_project))
        .route("/members", post(routes::members::add_member))
        .route(
            "/members/:project_id/:member_id",
            delete(routes::members::remove_member),
        )
        .route("/expenses", post(routes::expenses::create_expense))
        .route("/expenses/:id", delete(routes::expenses::delete_expense))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let v1_routes = public_routes.merge(protected_routes);

    // Configure CORS from the enumerated origins
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| match origin.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(%origin, "Ignoring unparseable CORS origin");
                    None
                }
            })
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// JWT authentication middleware layer
///
/// Extracts and validates the bearer token from the Authorization header,
/// then injects [`AuthSubject`] into request extensions.
async fn jwt_auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, crate::error::ApiError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            crate::error::ApiError::Unauthorized("Missing authorization header".to_string())
        })?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| crate::error::ApiError::BadRequest("Expected Bearer token".to_string()))?;

    let claims = jwt::validate_token(token, state.jwt_secret())?;

    req.extensions_mut().insert(AuthSubject(claims.sub));

    Ok(next.run(req).await)
}
