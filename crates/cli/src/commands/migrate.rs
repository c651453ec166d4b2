//! Database migration commands.
//!
//! The portal's only table is the session table. Its schema is owned by
//! `tower-sessions-sqlx-store`, so the migration delegates to the store
//! instead of keeping SQL files.

use clearpath_portal::middleware::postgres_store;
use clearpath_portal::middleware::session::{SESSION_SCHEMA, SESSION_TABLE};

use super::{CommandError, connect};

/// Create the session schema and table if they do not exist.
///
/// # Errors
///
/// Returns an error if the database is unreachable or the DDL fails.
pub async fn sessions() -> Result<(), CommandError> {
    let pool = connect().await?;
    let store = postgres_store(&pool)?;

    tracing::info!("Creating {SESSION_SCHEMA}.{SESSION_TABLE}...");
    store.migrate().await?;

    tracing::info!("Session migrations complete!");
    Ok(())
}
