use std::path::PathBuf;
use tokio::{fs::File, io};

use crate::domain::SessionId;

pub mod driver;
pub mod paths;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// Creates both namespaces of a session. Existing directories are not an error.
    async fn create_session(&self, session: &SessionId) -> io::Result<()>;
    async fn write_upload(
        &self,
        session: &SessionId,
        filename: &str,
        bytes: &[u8],
    ) -> io::Result<PathBuf>;
    async fn read_upload(&self, session: &SessionId, filename: &str) -> io::Result<Vec<u8>>;
    async fn write_output(
        &self,
        session: &SessionId,
        filename: &str,
        bytes: &[u8],
    ) -> io::Result<PathBuf>;
    /// Opens a processed file, refusing anything that resolves outside the output root.
    async fn open_output(&self, session: &SessionId, filename: &str) -> io::Result<File>;
}
