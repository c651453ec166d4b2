//! HTTP route handlers for the portal.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness check
//! GET  /health/ready                    - Readiness check (session database)
//!
//! # Auth (credentials checked by the platform backend)
//! GET  /login?from=                     - Login page
//! POST /login                           - Authenticate, set session, redirect back
//! POST /logout                          - Clear session
//!
//! # Public
//! GET  /                                - Redirect to role home or catalog
//! GET  /courses                         - Course catalog (paginated)
//! GET  /courses/{id}                    - Course detail
//! GET  /activities                      - Activity listing (paginated)
//!
//! # Member (MEMBER only)
//! GET  /member/enrollments              - Own enrollments
//! GET  /member/courses/{id}/certificate - Own certificate for a course
//! GET  /member/courses/{id}/quiz        - Course quiz
//!
//! # Dashboards (one role each)
//! GET  /admin                           - ADMIN
//! GET  /manager                         - MANAGER
//! GET  /consultant                      - CONSULTANT
//! GET  /staff                           - STAFF
//! ```

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect},
    routing::get,
};

use clearpath_core::Role;

use crate::db;
use crate::routes::dashboard::Dashboard;
use crate::middleware::{OptionalUser, guarded};
use crate::state::AppState;

pub mod activities;
pub mod auth;
pub mod courses;
pub mod dashboard;
pub mod member;

/// Build the full router (without the session layer).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .route("/", get(home))
        .merge(auth::router())
        .merge(courses::router())
        .merge(activities::router())
        .merge(guarded(Role::Member, member::router()))
        .merge(dashboards())
}

/// Every staff dashboard, each behind the guard for its own role.
fn dashboards() -> Router<AppState> {
    Dashboard::ALL
        .into_iter()
        .fold(Router::new(), |router, dashboard| {
            router.merge(guarded(dashboard.role(), dashboard::router(dashboard)))
        })
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 if the session database is configured but unreachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    let Some(pool) = state.pool() else {
        return StatusCode::OK;
    };
    match db::ping(pool).await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!("readiness check failed: {e}");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

/// Send logged-in users to their home page, everyone else to the catalog.
///
/// GET /
async fn home(OptionalUser(user): OptionalUser) -> impl IntoResponse {
    match user {
        Some(identity) => Redirect::to(identity.role.home_path()),
        None => Redirect::to("/courses"),
    }
}
