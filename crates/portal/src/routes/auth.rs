//! Authentication route handlers.
//!
//! The portal never checks passwords itself: credentials are forwarded to
//! the platform backend, and its answer (user id + role) is written to the
//! session.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tracing::instrument;

use clearpath_core::{LOGIN_PATH, safe_redirect_target};

use crate::backend::BackendError;
use crate::components::UserView;
use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{OptionalUser, SessionContext};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    /// Redirect-back location carried through the form.
    #[serde(default)]
    pub from: Option<String>,
}

/// Query parameters for the login page.
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub from: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub user: Option<UserView>,
    pub from: Option<String>,
    pub username: String,
    pub error: Option<String>,
}

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(LOGIN_PATH, get(login_page).post(login))
        .route("/logout", post(logout))
}

/// Render the login page.
///
/// GET /login?from=/member/enrollments
async fn login_page(
    OptionalUser(user): OptionalUser,
    Query(query): Query<LoginQuery>,
) -> impl IntoResponse {
    LoginTemplate {
        user: UserView::from_optional(user.as_ref()),
        from: safe_redirect_target(query.from.as_deref()).map(str::to_owned),
        username: String::new(),
        error: None,
    }
}

/// Authenticate against the backend and start a session.
///
/// POST /login
#[instrument(skip(state, context, form), fields(username = %form.username))]
async fn login(
    State(state): State<AppState>,
    context: SessionContext,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let from = safe_redirect_target(form.from.as_deref()).map(str::to_owned);
    let username = form.username.trim();

    let render_error = |message: &str| LoginTemplate {
        user: None,
        from: from.clone(),
        username: username.to_string(),
        error: Some(message.to_string()),
    };

    if username.is_empty() || form.password.is_empty() {
        return Ok(render_error("Enter your username and password.").into_response());
    }

    let authenticated = match state.backend().login(username, &form.password).await {
        Ok(authenticated) => authenticated,
        Err(BackendError::Unauthorized) => {
            tracing::info!("login rejected by backend");
            return Ok(render_error("Invalid username or password.").into_response());
        }
        Err(e) => {
            tracing::error!(error = %e, "login request to backend failed");
            return Ok(
                render_error("Sign-in is temporarily unavailable. Please try again.")
                    .into_response(),
            );
        }
    };

    context
        .set(authenticated.role, &authenticated.user_id)
        .await?;
    set_sentry_user(authenticated.user_id.as_str(), authenticated.role.as_str());

    let target = from.as_deref().unwrap_or_else(|| authenticated.role.home_path());
    Ok(Redirect::to(target).into_response())
}

/// Logout and clear session.
///
/// POST /logout
async fn logout(context: SessionContext) -> Result<Redirect, AppError> {
    context.clear().await?;
    clear_sentry_user();
    Ok(Redirect::to(LOGIN_PATH))
}
