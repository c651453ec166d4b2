//! HTTP middleware stack for the portal.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. Session layer (tower-sessions, `PostgreSQL` or memory store)
//! 4. Role guard (per route group, see [`guard::guarded`])

pub mod auth;
pub mod guard;
pub mod session;

pub use auth::{OptionalUser, RequireUser, SessionContext};
pub use guard::{guarded, login_url, require_role};
pub use session::{SessionStoreError, create_session_layer, memory_store, postgres_store};
