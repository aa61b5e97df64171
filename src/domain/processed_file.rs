use std::path::PathBuf;

use super::SessionId;

/// Describes one processed output. Built per request, never persisted.
#[derive(Clone, Debug)]
pub struct ProcessedFile {
    pub session_id: String,
    pub filename: String,
    pub absolute_path: PathBuf,
    pub public_url: String,
}

impl ProcessedFile {
    pub fn new(session: &SessionId, filename: &str, absolute_path: PathBuf) -> Self {
        ProcessedFile {
            session_id: session.to_string(),
            filename: filename.to_string(),
            absolute_path,
            public_url: public_url(session, filename),
        }
    }
}

/// Retrieval URL of an output, derived from the session and file name only.
pub fn public_url(session: &SessionId, filename: &str) -> String {
    format!("/outputs/{session}/{filename}")
}
