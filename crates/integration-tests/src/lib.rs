//! Integration test harness for the Clearpath portal.
//!
//! Each [`TestContext`] starts two servers on ephemeral localhost ports:
//! a fake platform backend ([`fake_backend`]) and the real portal router
//! over an in-memory session store. Tests talk to the portal over HTTP with
//! a cookie-keeping client that does not follow redirects, so every 303 can
//! be inspected.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p clearpath-integration-tests
//! ```

pub mod fake_backend;

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, header::LOCATION, redirect::Policy};
use tokio::net::TcpListener;
use tower_sessions::MemoryStore;
use tower_sessions::session::{Id, Record};
use tower_sessions::session_store::{self, SessionStore};
use url::Url;

use clearpath_portal::config::PortalConfig;
use clearpath_portal::middleware::memory_store;
use clearpath_portal::state::AppState;

/// Password accepted by the fake backend for every known user.
pub const PASSWORD: &str = "correct-horse-battery";

/// Running portal plus a client bound to one browser-like cookie jar.
pub struct TestContext {
    pub client: Client,
    pub portal_url: String,
}

impl TestContext {
    /// Start a fake backend and a portal pointed at it.
    pub async fn new() -> Self {
        let backend_url = fake_backend::spawn().await;
        Self::with_backend(backend_url).await
    }

    /// Start a portal pointed at `backend_url`, which may be unreachable.
    pub async fn with_backend(backend_url: Url) -> Self {
        Self::with_store(backend_url, memory_store()).await
    }

    /// Start a portal over a caller-supplied session store.
    pub async fn with_store<S>(backend_url: Url, store: S) -> Self
    where
        S: SessionStore + Clone,
    {
        let state = AppState::new(PortalConfig::local(backend_url), None)
            .expect("Failed to build application state");
        let router = clearpath_portal::app(state, store);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind portal listener");
        let addr = listener.local_addr().expect("Failed to read portal address");
        tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("Portal server error");
        });

        Self {
            client: new_client(),
            portal_url: format!("http://{addr}"),
        }
    }

    /// Absolute portal URL for a path.
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.portal_url)
    }

    /// GET a portal path.
    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("Portal GET failed")
    }

    /// Submit the login form.
    pub async fn login_as(&self, username: &str, from: Option<&str>) -> Response {
        self.login_with(username, PASSWORD, from).await
    }

    /// Submit the login form with an explicit password.
    pub async fn login_with(&self, username: &str, password: &str, from: Option<&str>) -> Response {
        let mut form = vec![("username", username), ("password", password)];
        if let Some(from) = from {
            form.push(("from", from));
        }
        self.client
            .post(self.url("/login"))
            .form(&form)
            .send()
            .await
            .expect("Portal login failed")
    }

    /// Submit the logout form.
    pub async fn logout(&self) -> Response {
        self.client
            .post(self.url("/logout"))
            .send()
            .await
            .expect("Portal logout failed")
    }
}

/// Memory session store whose loads can be switched to fail, as if the
/// database went away mid-session.
#[derive(Debug, Clone, Default)]
pub struct FailingStore {
    inner: MemoryStore,
    failing: Arc<AtomicBool>,
}

impl FailingStore {
    /// Make every later `load` return a backend error.
    pub fn fail_loads(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl SessionStore for FailingStore {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        self.inner.create(record).await
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        self.inner.save(record).await
    }

    async fn load(&self, session_id: &Id) -> session_store::Result<Option<Record>> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(session_store::Error::Backend("store unavailable".to_string()));
        }
        self.inner.load(session_id).await
    }

    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        self.inner.delete(session_id).await
    }
}

/// Client with its own cookie jar that reports redirects instead of following them.
fn new_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

/// Assert a 303 and return its `Location`.
pub fn redirect_location(response: &Response) -> String {
    assert_eq!(
        response.status(),
        StatusCode::SEE_OTHER,
        "expected redirect from {}",
        response.url()
    );
    response
        .headers()
        .get(LOCATION)
        .expect("redirect without Location")
        .to_str()
        .expect("non-ASCII Location")
        .to_string()
}

/// Address nothing listens on, for backend outage tests.
pub async fn closed_backend_url() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind throwaway listener");
    let addr: SocketAddr = listener.local_addr().expect("Failed to read throwaway address");
    drop(listener);
    Url::parse(&format!("http://{addr}/api/")).expect("valid URL")
}
