//! Session maintenance commands.

use tower_sessions::ExpiredDeletion;

use clearpath_portal::middleware::postgres_store;

use super::{CommandError, connect};

/// Delete every expired session row.
///
/// The portal runs the same sweep hourly; this is for one-off cleanup.
///
/// # Errors
///
/// Returns an error if the database is unreachable or the delete fails.
pub async fn purge() -> Result<(), CommandError> {
    let pool = connect().await?;
    let store = postgres_store(&pool)?;

    store.delete_expired().await?;

    tracing::info!("Expired sessions deleted");
    Ok(())
}
