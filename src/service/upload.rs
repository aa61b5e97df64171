use std::sync::Arc;

use axum::Json;
use axum::extract::{Multipart, State};
use axum::extract::multipart::MultipartRejection;
use serde::Serialize;

use crate::error::AppError;
use crate::service::ingest::{FileEntry, ingest};
use crate::service::pipeline::process_batch;
use crate::service::session::allocate_session;
use crate::utils::state::AppState;

pub const FILES_FIELD: &str = "files";

#[derive(Serialize, Debug)]
pub struct UploadResponse {
    pub session_id: String,
    pub uploaded_files: Vec<String>,
    pub processed_files: Vec<String>,
    pub processed_file_urls: Vec<String>,
}

/// POST /upload
pub async fn upload_handler(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, AppError> {
    let multipart = multipart.map_err(|rejection| {
        tracing::debug!("rejecting non-multipart upload: {rejection}");
        AppError::NoFilesPart
    })?;
    let entries = collect_entries(multipart).await?;

    let session = allocate_session(state.storage.as_ref()).await?;
    let ingested = ingest(state.storage.as_ref(), &session, entries).await?;
    let processed = process_batch(&state, &session, &ingested).await?;

    Ok(Json(UploadResponse {
        session_id: session.to_string(),
        uploaded_files: ingested
            .iter()
            .map(|file| file.upload_path.display().to_string())
            .collect(),
        processed_files: processed
            .iter()
            .map(|file| file.absolute_path.display().to_string())
            .collect(),
        processed_file_urls: processed.into_iter().map(|file| file.public_url).collect(),
    }))
}

/// Reads every `files` file part of the form. Other fields, including plain
/// text parts named `files`, are ignored.
async fn collect_entries(mut multipart: Multipart) -> Result<Vec<FileEntry>, AppError> {
    let mut saw_files_part = false;
    let mut entries = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILES_FIELD) {
            continue;
        }
        let Some(name) = field.file_name().map(str::to_string) else {
            continue;
        };
        saw_files_part = true;

        let bytes = field.bytes().await?;
        // An empty file input still submits a nameless, empty part.
        if name.is_empty() && bytes.is_empty() {
            continue;
        }
        entries.push(FileEntry { name, bytes });
    }

    if !saw_files_part {
        return Err(AppError::NoFilesPart);
    }
    if entries.is_empty() {
        return Err(AppError::NoFilesUploaded);
    }
    Ok(entries)
}
