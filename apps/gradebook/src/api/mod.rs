//! # Gradebook HTTP API Module
//!
//! This module implements the HTTP REST API server using axum.
//!
//! ## Endpoints
//!
//! - `GET  /health` - Health check
//! - `POST /auth/login` - Obtain a session token
//! - `POST /auth/logout` - Revoke the current session token
//! - `POST /auth/change-password` - Rotate the admin password
//! - `GET  /students` - List students (filterable)
//! - `POST /students` - Create a student
//! - `GET/PATCH/DELETE /students/{id}` - One student
//! - `POST /students/{id}/subjects` - Enroll a subject
//! - `PATCH/DELETE /students/{id}/subjects/{sid}` - One subject
//! - `PUT  /students/{id}/subjects/{sid}/grade` - Record a stage grade
//!
//! Mutating endpoints require `Authorization: Bearer <token>`; reads and
//! login are open.
//!
//! ## Security Configuration (Environment Variables)
//!
//! - `GRADEBOOK_CORS_ORIGINS`: Comma-separated list of allowed origins, or "*" for all (default: localhost only)
//! - `GRADEBOOK_RATE_LIMIT`: Requests per second (default: 100, 0 to disable)

mod auth;
mod handlers;
mod middleware;
mod types;

// Re-exports for external use
pub use middleware::{create_rate_limiter, get_rate_limit_from_env};
// Re-export handlers and types for integration tests (via `gradebook::api::*`)
#[allow(unused_imports)]
pub use types::{
    ChangePasswordRequest, CreateStudentRequest, CreateSubjectRequest, ErrorResponse,
    HealthResponse, LoginRequest, SetGradeRequest, StudentQuery, StudentView, SubjectView,
    TokenResponse, UpdateStudentRequest, UpdateSubjectRequest,
};

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, post, put},
};
use gradebook_core::{CredentialStore, GradebookError, StudentRegistry, TokenStore};
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state holding the three file-backed stores.
///
/// The stores synchronize their own writers internally, so the state is
/// plain `Arc`s with no outer lock.
#[derive(Clone)]
pub struct AppState {
    /// The student record store.
    pub registry: Arc<StudentRegistry>,
    /// The single-admin credential store.
    pub credentials: Arc<CredentialStore>,
    /// The session token store.
    pub tokens: Arc<TokenStore>,
}

impl AppState {
    /// Build app state with the conventional file names under `data_dir`.
    #[must_use]
    pub fn new(data_dir: &Path) -> Self {
        Self {
            registry: Arc::new(StudentRegistry::new(data_dir.join("students.json"))),
            credentials: Arc::new(CredentialStore::new(data_dir.join("admin.json"))),
            tokens: Arc::new(TokenStore::new(data_dir.join("tokens.json"))),
        }
    }

    /// Create any missing backing files: the bootstrap admin record, an
    /// empty token set, and an empty student collection. Idempotent.
    pub fn bootstrap(&self) -> Result<(), GradebookError> {
        self.credentials.ensure_initialized()?;
        self.tokens.ensure_initialized()?;
        self.registry.ensure_initialized()
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build CORS layer from environment configuration.
///
/// Reads `GRADEBOOK_CORS_ORIGINS` environment variable:
/// - If "*": allows all origins (development mode - use with caution!)
/// - If not set: defaults to localhost only (restrictive default)
/// - Otherwise: parses comma-separated list of allowed origins
fn build_cors_layer() -> CorsLayer {
    let origins_env = std::env::var("GRADEBOOK_CORS_ORIGINS").ok();

    match origins_env.as_deref() {
        Some("*") => {
            tracing::warn!(
                "CORS: Allowing ALL origins (GRADEBOOK_CORS_ORIGINS=*). This is insecure for production!"
            );
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed_origins: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|s| {
                    let trimmed = s.trim();
                    match trimmed.parse::<HeaderValue>() {
                        Ok(hv) => {
                            tracing::info!("CORS: Allowing origin: {}", trimmed);
                            Some(hv)
                        }
                        Err(e) => {
                            tracing::warn!("CORS: Invalid origin '{}': {}", trimmed, e);
                            None
                        }
                    }
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::warn!(
                    "CORS: No valid origins in GRADEBOOK_CORS_ORIGINS, defaulting to localhost only"
                );
                build_localhost_cors()
            } else {
                CorsLayer::new()
                    .allow_origin(allowed_origins)
                    .allow_methods([
                        Method::GET,
                        Method::POST,
                        Method::PATCH,
                        Method::PUT,
                        Method::DELETE,
                        Method::OPTIONS,
                    ])
                    .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            }
        }
        None => {
            tracing::info!("CORS: No GRADEBOOK_CORS_ORIGINS set, defaulting to localhost only");
            build_localhost_cors()
        }
    }
}

/// Build a restrictive CORS layer that only allows localhost origins.
fn build_localhost_cors() -> CorsLayer {
    let localhost_origins = vec![
        "http://localhost:3000".parse::<HeaderValue>().ok(),
        "http://localhost:8080".parse::<HeaderValue>().ok(),
        "http://127.0.0.1:3000".parse::<HeaderValue>().ok(),
        "http://127.0.0.1:8080".parse::<HeaderValue>().ok(),
    ];
    let origins: Vec<HeaderValue> = localhost_origins.into_iter().flatten().collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing - logs all requests
/// 2. CORS - handles preflight requests
/// 3. Rate Limiting - protects against DoS (if enabled)
/// 4. Authentication - validates session tokens on mutating requests
pub fn create_router(state: AppState) -> Router {
    let cors = build_cors_layer();

    // Check if rate limiting is enabled
    let rate_limit = get_rate_limit_from_env();
    let rate_limiter = if rate_limit > 0 {
        tracing::info!("Rate limiting enabled: {} requests/second", rate_limit);
        Some(create_rate_limiter(rate_limit))
    } else {
        tracing::info!("Rate limiting disabled");
        None
    };

    // Build base router with routes
    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/auth/login", post(handlers::login_handler))
        .route("/auth/logout", post(handlers::logout_handler))
        .route("/auth/change-password", post(handlers::change_password_handler))
        .route(
            "/students",
            get(handlers::list_students_handler).post(handlers::create_student_handler),
        )
        .route(
            "/students/{id}",
            get(handlers::get_student_handler)
                .patch(handlers::update_student_handler)
                .delete(handlers::delete_student_handler),
        )
        .route(
            "/students/{id}/subjects",
            post(handlers::add_subject_handler),
        )
        .route(
            "/students/{id}/subjects/{sid}",
            axum::routing::patch(handlers::update_subject_handler)
                .delete(handlers::delete_subject_handler),
        )
        .route(
            "/students/{id}/subjects/{sid}/grade",
            put(handlers::set_grade_handler),
        );

    // Apply authentication middleware (innermost - runs last on request)
    router = router.layer(axum_middleware::from_fn_with_state(
        state.clone(),
        auth::require_token_middleware,
    ));

    // Apply rate limiting middleware
    if let Some(limiter) = rate_limiter {
        router = router.layer(axum_middleware::from_fn_with_state(
            limiter,
            middleware::rate_limit_middleware,
        ));
    }

    // Apply CORS, body limit, and tracing (outermost layers)
    router
        .layer(axum::extract::DefaultBodyLimit::max(1024 * 1024))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server.
pub async fn run_server(addr: &str, state: AppState) -> Result<(), GradebookError> {
    state.bootstrap()?;
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| GradebookError::Io(format!("Bind failed: {}", e)))?;

    tracing::info!("Gradebook HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .await
        .map_err(|e| GradebookError::Io(format!("Server error: {}", e)))
}
