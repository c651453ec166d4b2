//! Session role store and authentication extractors.
//!
//! [`SessionContext`] is the only way handlers and middleware touch the
//! authenticated role and user id. It wraps the per-request
//! `tower_sessions::Session` installed by the session layer, so nothing
//! reads session state from a global.

use axum::{
    extract::{FromRequestParts, OriginalUri},
    http::{Extensions, StatusCode, Uri, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use clearpath_core::{Role, SessionIdentity, UserId};

use crate::middleware::guard::login_url;
use crate::models::session_keys;

/// Read/write view of the authenticated role and user id for one request.
///
/// # Example
///
/// ```rust,ignore
/// async fn whoami(context: SessionContext) -> String {
///     match context.identity().await {
///         Some(identity) => format!("{} ({})", identity.user_id, identity.role),
///         None => "anonymous".to_string(),
///     }
/// }
/// ```
#[derive(Clone)]
pub struct SessionContext {
    session: Session,
}

impl SessionContext {
    /// Wrap a session.
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }

    /// Record a successful login, overwriting any previous identity.
    ///
    /// The session id is cycled first so a pre-login cookie cannot be
    /// reused after authentication.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be read or written.
    pub async fn set(
        &self,
        role: Role,
        user_id: &UserId,
    ) -> Result<(), tower_sessions::session::Error> {
        self.session.cycle_id().await?;
        self.session.insert(session_keys::ROLE, role).await?;
        self.session.insert(session_keys::USER_ID, user_id).await?;
        tracing::info!(%role, %user_id, "session identity set");
        Ok(())
    }

    /// The session's role, if logged in.
    ///
    /// A store failure or an unreadable value counts as "no role".
    pub async fn role(&self) -> Option<Role> {
        match self.session.get::<Role>(session_keys::ROLE).await {
            Ok(role) => role,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read role from session");
                None
            }
        }
    }

    /// The session's user id, if logged in.
    pub async fn user_id(&self) -> Option<UserId> {
        match self.session.get::<UserId>(session_keys::USER_ID).await {
            Ok(user_id) => user_id,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read user id from session");
                None
            }
        }
    }

    /// Both values, present only when the role and the user id are set.
    pub async fn identity(&self) -> Option<SessionIdentity> {
        let role = self.role().await?;
        let user_id = self.user_id().await?;
        Some(SessionIdentity::new(role, user_id))
    }

    /// Log out: drop the identity and delete the session from the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be deleted from the store.
    pub async fn clear(&self) -> Result<(), tower_sessions::session::Error> {
        self.session.flush().await?;
        tracing::info!("session cleared");
        Ok(())
    }
}

impl<S> FromRequestParts<S> for SessionContext
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = Session::from_request_parts(parts, state).await?;
        Ok(Self::new(session))
    }
}

/// Extractor that requires a logged-in user.
///
/// Role checks belong to the route guard; this only guarantees an identity
/// so handlers can scope backend calls to "the current user". Without one,
/// the request is redirected to login with the original location attached.
///
/// # Example
///
/// ```rust,ignore
/// async fn my_enrollments(RequireUser(user): RequireUser) -> impl IntoResponse {
///     format!("enrollments for {}", user.user_id)
/// }
/// ```
pub struct RequireUser(pub SessionIdentity);

/// Rejection for [`RequireUser`].
pub enum RequireUserRejection {
    /// No identity in the session.
    RedirectToLogin(String),
    /// Session layer missing.
    SessionUnavailable,
}

impl IntoResponse for RequireUserRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin(url) => Redirect::to(&url).into_response(),
            Self::SessionUnavailable => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Session unavailable").into_response()
            }
        }
    }
}

impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = RequireUserRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let context = SessionContext::from_request_parts(parts, state)
            .await
            .map_err(|_| RequireUserRejection::SessionUnavailable)?;

        match context.identity().await {
            Some(identity) => Ok(Self(identity)),
            None => {
                let location = requested_location(&parts.uri, &parts.extensions);
                Err(RequireUserRejection::RedirectToLogin(login_url(Some(
                    &location,
                ))))
            }
        }
    }
}

/// Extractor that optionally gets the current user.
///
/// Unlike [`RequireUser`], this never rejects; public pages use it to show
/// login state in the navigation.
pub struct OptionalUser(pub Option<SessionIdentity>);

impl<S> FromRequestParts<S> for OptionalUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let identity = match SessionContext::from_request_parts(parts, state).await {
            Ok(context) => context.identity().await,
            Err(_) => None,
        };

        Ok(Self(identity))
    }
}

/// Path and query of the request as the browser sent it, before any
/// router nesting stripped a prefix.
pub(crate) fn requested_location(uri: &Uri, extensions: &Extensions) -> String {
    let uri = extensions
        .get::<OriginalUri>()
        .map_or(uri, |original| &original.0);

    uri.path_and_query()
        .map_or_else(|| uri.path().to_string(), ToString::to_string)
}
