use std::path::{Path, PathBuf};

use crate::domain::SessionId;
use crate::storage::Storage;
use crate::storage::paths::PathManager;

use tokio::{
    fs::{File, canonicalize, create_dir_all, metadata, read, remove_file, rename},
    io::{self, AsyncWriteExt, BufWriter},
};

pub struct FilesystemStorage {
    path_manager: PathManager,
}

impl FilesystemStorage {
    pub fn new(upload_root: impl Into<PathBuf>, output_root: impl Into<PathBuf>) -> Self {
        FilesystemStorage {
            path_manager: PathManager::new(upload_root, output_root),
        }
    }

    pub fn path_manager(&self) -> &PathManager {
        &self.path_manager
    }

    // The session directory must already exist: a namespace swept away mid-request
    // surfaces as NotFound instead of being silently recreated.
    async fn write_file(path: &Path, bytes: &[u8]) -> io::Result<()> {
        let file = File::create(path).await?;
        let mut writer = BufWriter::new(file);
        writer.write_all(bytes).await?;
        writer.flush().await?;
        writer.into_inner().sync_all().await
    }
}

#[async_trait::async_trait]
impl Storage for FilesystemStorage {
    async fn create_session(&self, session: &SessionId) -> io::Result<()> {
        create_dir_all(self.path_manager.upload_session_path(session)).await?;
        create_dir_all(self.path_manager.output_session_path(session)).await?;
        Ok(())
    }

    async fn write_upload(
        &self,
        session: &SessionId,
        filename: &str,
        bytes: &[u8],
    ) -> io::Result<PathBuf> {
        let path = self.path_manager.upload_file_path(session, filename);
        Self::write_file(&path, bytes).await?;
        Ok(path)
    }

    async fn read_upload(&self, session: &SessionId, filename: &str) -> io::Result<Vec<u8>> {
        read(self.path_manager.upload_file_path(session, filename)).await
    }

    async fn write_output(
        &self,
        session: &SessionId,
        filename: &str,
        bytes: &[u8],
    ) -> io::Result<PathBuf> {
        let partial_path = self.path_manager.output_partial_path(session, filename);
        let final_path = self.path_manager.output_file_path(session, filename);

        let written = async {
            Self::write_file(&partial_path, bytes).await?;
            rename(&partial_path, &final_path).await
        }
        .await;

        if let Err(err) = written {
            // Best effort; the reclaimer removes anything left behind.
            let _ = remove_file(&partial_path).await;
            return Err(err);
        }
        Ok(final_path)
    }

    async fn open_output(&self, session: &SessionId, filename: &str) -> io::Result<File> {
        let root = canonicalize(self.path_manager.outputs_path()).await?;
        let resolved = canonicalize(self.path_manager.output_file_path(session, filename)).await?;
        if !resolved.starts_with(&root) || resolved == root {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("{} escapes the output root", resolved.display()),
            ));
        }
        if !metadata(&resolved).await?.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} is not a file", resolved.display()),
            ));
        }
        File::open(resolved).await
    }
}
