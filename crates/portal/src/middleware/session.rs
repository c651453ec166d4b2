//! Session middleware configuration for the portal.
//!
//! Production sessions live in `PostgreSQL` via tower-sessions, so a login
//! survives browser reloads and portal restarts. Without a database URL the
//! portal falls back to an in-process memory store.

use sqlx::PgPool;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer, SessionStore};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::PortalConfig;

/// Session cookie name for the portal.
pub const SESSION_COOKIE_NAME: &str = "cp_portal_session";

/// Session expiry time in seconds (24 hours of inactivity).
const SESSION_EXPIRY_SECONDS: i64 = 24 * 60 * 60;

/// Schema holding the session table.
pub const SESSION_SCHEMA: &str = "portal";

/// Session table name.
pub const SESSION_TABLE: &str = "session";

/// Errors creating the session store.
#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    #[error("invalid session store identifier: {0}")]
    InvalidIdentifier(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Create the `PostgreSQL` session store in the `portal` schema.
///
/// The table must exist; create it with `cp-cli migrate sessions`.
///
/// # Errors
///
/// Returns an error if the schema or table name is rejected by the store.
pub fn postgres_store(pool: &PgPool) -> Result<PostgresStore, SessionStoreError> {
    PostgresStore::new(pool.clone())
        .with_schema_name(SESSION_SCHEMA)
        .map_err(|e| SessionStoreError::InvalidIdentifier(e.to_string()))?
        .with_table_name(SESSION_TABLE)
        .map_err(|e| SessionStoreError::InvalidIdentifier(e.to_string()))
}

/// In-process store for development and tests. Sessions die with the process.
#[must_use]
pub fn memory_store() -> MemoryStore {
    MemoryStore::default()
}

/// Create the session layer over any store.
///
/// # Arguments
///
/// * `store` - Backing session store
/// * `config` - Portal configuration (for determining HTTPS mode)
#[must_use]
pub fn create_session_layer<S>(store: S, config: &PortalConfig) -> SessionManagerLayer<S>
where
    S: SessionStore + Clone,
{
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        // Lax so the cookie is sent on the top-level redirect back from login
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
