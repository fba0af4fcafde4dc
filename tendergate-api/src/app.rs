/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use tendergate_api::{app::AppState, config::Config};
/// use tendergate_shared::mail::NoopMailer;
/// use sqlx::PgPool;
/// use std::sync::Arc;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config, Arc::new(NoopMailer));
/// let app = tendergate_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, patch, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tendergate_shared::auth::session::session_middleware;
use tendergate_shared::mail::Mailer;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Outbound mail delivery (SMTP in production, log-only otherwise)
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            db,
            config: Arc::new(config),
            mailer,
        }
    }

    /// Gets the session signing secret
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// The router is organized as follows:
/// ```text
/// /
/// ├── /health                        # Health check (public)
/// ├── /v1/
/// │   ├── /auth/                     # Authentication (public)
/// │   │   ├── POST /register
/// │   │   ├── POST /login
/// │   │   └── POST /logout
/// │   ├── GET  /confirm-email        # Token link from the mail (public)
/// │   ├── /onboarding*, /documents,  # Session required (401 on failure);
/// │   │   /plans, /resend-confirmation   reachable while incomplete
/// │   ├── /dashboard, /account/      # Route guard: session + completed
/// │   └── /admin/                    # Role guard: session + admin role
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Session / route guard / role guard (per route group)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes (public)
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/logout", post(routes::auth::logout));

    // Session-scoped routes: a valid session is required (401 otherwise) but
    // onboarding completion is NOT. This is where onboarding happens, so the
    // route guard must never be mounted here.
    let secret = state.config.jwt.secret.clone();
    let session_routes = Router::new()
        .route("/onboarding-status", get(routes::onboarding::get_status))
        .route("/onboarding", get(routes::onboarding::get_view))
        .route("/onboarding/next-step", post(routes::onboarding::next_step))
        .route(
            "/resend-confirmation",
            post(routes::auth::resend_confirmation),
        )
        .route("/documents", post(routes::documents::submit_document))
        .route("/documents", get(routes::documents::list_documents))
        .route("/plans", get(routes::plans::list_plans))
        .route("/plans/select", post(routes::plans::select_plan))
        .layer(axum::middleware::from_fn(move |req, next| {
            session_middleware(secret.clone(), req, next)
        }));

    // Guarded routes: session + completed onboarding, enforced before any
    // handler runs. Redirects instead of 401s (navigation semantics).
    let guarded_routes = Router::new()
        .route("/dashboard", get(routes::dashboard::overview))
        .route("/account/profile", get(routes::account::get_profile))
        .route("/account/profile", patch(routes::account::update_profile))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::route_guard::route_guard,
        ));

    // Administrative routes: session + admin role, onboarding ignored.
    let admin_routes = Router::new()
        .route("/accounts", get(routes::admin::list_accounts))
        .route("/overview", get(routes::admin::overview))
        .route(
            "/documents/:id/review",
            post(routes::admin::review_document),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::role_guard::role_guard,
        ));

    let v1_routes = Router::new()
        .nest("/auth", auth_routes)
        .route("/confirm-email", get(routes::auth::confirm_email))
        .merge(session_routes)
        .merge(guarded_routes)
        .nest("/admin", admin_routes);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::COOKIE])
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
