use std::path::PathBuf;

use axum::body::Bytes;
use tokio::io;

use crate::domain::SessionId;
use crate::domain::session::generate_filename;
use crate::storage::Storage;
use crate::utils::validation::has_accepted_extension;

/// One submitted file as received from the client.
#[derive(Clone, Debug)]
pub struct FileEntry {
    pub name: String,
    pub bytes: Bytes,
}

/// An accepted file persisted under the session's upload namespace.
#[derive(Clone, Debug)]
pub struct IngestedFile {
    pub original_name: String,
    pub filename: String,
    pub upload_path: PathBuf,
}

/// Persists every accepted entry, in submission order, before any processing.
///
/// Entries whose declared name lacks an accepted image extension are skipped,
/// not rejected, so a batch may ingest nothing and still succeed.
pub async fn ingest(
    storage: &dyn Storage,
    session: &SessionId,
    entries: Vec<FileEntry>,
) -> io::Result<Vec<IngestedFile>> {
    let submitted = entries.len();
    let mut ingested = Vec::with_capacity(submitted);

    for entry in entries {
        if !has_accepted_extension(&entry.name) {
            tracing::debug!(session = %session, name = %entry.name, "skipping unsupported file");
            continue;
        }
        let filename = generate_filename();
        let upload_path = storage.write_upload(session, &filename, &entry.bytes).await?;
        ingested.push(IngestedFile {
            original_name: entry.name,
            filename,
            upload_path,
        });
    }

    tracing::info!(
        session = %session,
        accepted = ingested.len(),
        skipped = submitted - ingested.len(),
        "ingested upload batch"
    );
    Ok(ingested)
}
