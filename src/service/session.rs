use tokio::io;

use crate::domain::SessionId;
use crate::storage::Storage;

/// Allocates a fresh session and eagerly creates both of its namespaces.
/// Failure here is fatal for the request and is not retried.
pub async fn allocate_session(storage: &dyn Storage) -> io::Result<SessionId> {
    let session = SessionId::generate();
    storage.create_session(&session).await?;
    tracing::debug!(session = %session, "allocated session namespaces");
    Ok(session)
}
