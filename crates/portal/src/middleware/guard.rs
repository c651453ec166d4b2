//! Role-based route guard.
//!
//! Wraps a group of routes so they render only for sessions holding exactly
//! the required role. The decision comes from [`clearpath_core::authorize`]
//! and is made fresh on every request:
//!
//! - no role: `303 See Other` to `/login?from=<original location>`
//! - other role: `403` with the "Access Denied" page, no redirect
//! - same role: the wrapped route runs unchanged
//!
//! # Example
//!
//! ```rust,ignore
//! let admin = guarded(Role::Admin, dashboard::router(Dashboard::Admin));
//! ```

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Redirect, Response},
};

use clearpath_core::{AccessDecision, LOGIN_PATH, Role, authorize};

use crate::components::UserView;
use crate::filters;
use crate::middleware::auth::{SessionContext, requested_location};

/// "Access Denied" page rendered in place of protected content.
#[derive(Template, WebTemplate)]
#[template(path = "access_denied.html")]
pub struct AccessDeniedTemplate {
    pub user: Option<UserView>,
    pub required_label: &'static str,
}

/// Put every route of `router` behind a guard for `required`.
///
/// Uses `route_layer`, so requests that match no route still get a plain 404.
pub fn guarded<S>(required: Role, router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.route_layer(middleware::from_fn_with_state(required, require_role))
}

/// Guard middleware. State is the role the wrapped routes demand.
pub async fn require_role(
    State(required): State<Role>,
    context: SessionContext,
    request: Request,
    next: Next,
) -> Response {
    let location = requested_location(request.uri(), request.extensions());
    let role = context.role().await;

    match authorize(role, required, &location) {
        AccessDecision::Allow => next.run(request).await,
        AccessDecision::RedirectToLogin { from } => {
            tracing::debug!(%required, %from, "unauthenticated request, redirecting to login");
            Redirect::to(&login_url(Some(&from))).into_response()
        }
        AccessDecision::Denied { required, actual } => {
            tracing::info!(%required, %actual, %location, "access denied");
            let user = context.identity().await.as_ref().map(UserView::from);
            (
                StatusCode::FORBIDDEN,
                AccessDeniedTemplate {
                    user,
                    required_label: required.label(),
                },
            )
                .into_response()
        }
    }
}

/// Login URL carrying an optional redirect-back location.
///
/// `login_url(Some("/admin?tab=users"))` is `/login?from=%2Fadmin%3Ftab%3Dusers`.
#[must_use]
pub fn login_url(from: Option<&str>) -> String {
    match from {
        Some(from) if !from.is_empty() => {
            format!("{LOGIN_PATH}?from={}", urlencoding::encode(from))
        }
        _ => LOGIN_PATH.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_url_without_location() {
        assert_eq!(login_url(None), "/login");
        assert_eq!(login_url(Some("")), "/login");
    }

    #[test]
    fn test_login_url_encodes_location() {
        assert_eq!(login_url(Some("/dashboard")), "/login?from=%2Fdashboard");
        assert_eq!(
            login_url(Some("/admin?tab=users")),
            "/login?from=%2Fadmin%3Ftab%3Dusers"
        );
    }
}
