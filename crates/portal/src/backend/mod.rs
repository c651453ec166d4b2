//! Platform backend API client.
//!
//! The backend owns all business logic (enrollment, quiz scoring,
//! certificate issuance, activity publishing). The portal only reads from it
//! and asks it to authenticate users.
//!
//! Every call is a single request: no retry, no backoff, no caching.
//!
//! # Endpoints
//!
//! ```text
//! POST auth/login                              -> LoginResponse
//! GET  courses                                 -> [Course]
//! GET  courses/{id}                            -> Course
//! GET  courses/{id}/quiz                       -> Quiz
//! GET  activities                              -> [Activity]
//! GET  members/{memberId}/enrollments          -> [Enrollment]
//! GET  certificates?memberId=..&courseId=..    -> Certificate
//! ```

mod types;

pub use types::*;

use std::sync::Arc;

use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::instrument;
use url::Url;

use clearpath_core::{CourseId, UserId};

use crate::config::BackendConfig;

/// Errors that can occur when talking to the platform backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed (connection refused, timeout, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an unexpected error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Credentials rejected or token invalid.
    #[error("Unauthorized")]
    Unauthorized,

    /// Failed to build a URL or parse a response.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Platform backend API client.
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl BackendClient {
    /// Create a new backend client.
    ///
    /// # Errors
    ///
    /// Returns error if the token is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let mut headers = HeaderMap::new();

        if let Some(token) = &config.token {
            let value = format!("Bearer {}", token.expose_secret());
            let mut value = HeaderValue::from_str(&value)
                .map_err(|e| BackendError::Parse(format!("Invalid token format: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        // A base without a trailing slash would drop its last segment on join.
        let mut base_url = config.base_url.clone();
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        Ok(Self {
            inner: Arc::new(BackendClientInner { client, base_url }),
        })
    }

    /// The base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Authenticate a user. Bad credentials yield [`BackendError::Unauthorized`].
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, BackendError> {
        let url = self.url(&["auth", "login"])?;
        let body = LoginRequest { username, password };
        let response = self.inner.client.post(url).json(&body).send().await?;
        Self::handle_response(response).await
    }

    /// List the course catalog.
    #[instrument(skip(self))]
    pub async fn list_courses(&self) -> Result<Vec<Course>, BackendError> {
        self.get(&["courses"], &[]).await
    }

    /// Fetch one course.
    #[instrument(skip(self))]
    pub async fn get_course(&self, id: &CourseId) -> Result<Course, BackendError> {
        self.get(&["courses", id.as_str()], &[]).await
    }

    /// Fetch the quiz attached to a course.
    #[instrument(skip(self))]
    pub async fn get_quiz(&self, course_id: &CourseId) -> Result<Quiz, BackendError> {
        self.get(&["courses", course_id.as_str(), "quiz"], &[]).await
    }

    /// List published activities.
    #[instrument(skip(self))]
    pub async fn list_activities(&self) -> Result<Vec<Activity>, BackendError> {
        self.get(&["activities"], &[]).await
    }

    /// List a member's enrollments.
    #[instrument(skip(self))]
    pub async fn list_enrollments(&self, member_id: &UserId) -> Result<Vec<Enrollment>, BackendError> {
        self.get(&["members", member_id.as_str(), "enrollments"], &[])
            .await
    }

    /// Look up the certificate a member earned for a course.
    #[instrument(skip(self))]
    pub async fn get_certificate(
        &self,
        member_id: &UserId,
        course_id: &CourseId,
    ) -> Result<Certificate, BackendError> {
        self.get(
            &["certificates"],
            &[
                ("memberId", member_id.as_str()),
                ("courseId", course_id.as_str()),
            ],
        )
        .await
    }

    /// Build a URL from percent-encoded path segments and query pairs.
    fn url(&self, segments: &[&str]) -> Result<Url, BackendError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| BackendError::Parse("backend URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Execute a GET request against the backend.
    async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<T, BackendError> {
        let mut url = self.url(segments)?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        tracing::debug!(%url, "backend GET");
        let response = self.inner.client.get(url).send().await?;
        Self::handle_response(response).await
    }

    /// Handle API response and parse JSON.
    async fn handle_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, BackendError> {
        let status = response.status();

        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| BackendError::Parse(format!("Failed to parse response: {e}")));
        }

        Err(Self::parse_error(response).await)
    }

    /// Map an error response to a [`BackendError`].
    async fn parse_error(response: reqwest::Response) -> BackendError {
        let status = response.status();

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => BackendError::Unauthorized,
            StatusCode::NOT_FOUND => BackendError::NotFound(response.url().path().to_string()),
            _ => {
                let message = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                BackendError::Api {
                    status: status.as_u16(),
                    message,
                }
            }
        }
    }
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> BackendClient {
        BackendClient::new(&BackendConfig::new(Url::parse(base).unwrap())).unwrap()
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let client = client("https://api.clearpath.test/v1");
        assert_eq!(client.base_url().as_str(), "https://api.clearpath.test/v1/");
    }

    #[test]
    fn test_url_joins_segments_under_base_path() {
        let client = client("https://api.clearpath.test/v1/");
        let url = client.url(&["members", "m-1", "enrollments"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.clearpath.test/v1/members/m-1/enrollments"
        );
    }

    #[test]
    fn test_url_encodes_segments() {
        let client = client("https://api.clearpath.test/");
        let url = client.url(&["courses", "intro to harm reduction"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.clearpath.test/courses/intro%20to%20harm%20reduction"
        );
    }

    #[test]
    fn test_invalid_token_header_is_rejected() {
        let config = BackendConfig {
            base_url: Url::parse("https://api.clearpath.test/").unwrap(),
            token: Some(secrecy::SecretString::from("bad\ntoken")),
        };
        assert!(matches!(
            BackendClient::new(&config),
            Err(BackendError::Parse(_))
        ));
    }
}
