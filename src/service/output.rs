use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::IntoResponse;
use tokio::io;
use tokio_util::io::ReaderStream;

use crate::domain::SessionId;
use crate::error::AppError;
use crate::utils::state::AppState;
use crate::utils::validation::is_valid_filename;

/// GET /outputs/<session_id>/<filename>
pub async fn get_output_handler(
    State(state): State<Arc<AppState>>,
    Path((session_id, filename)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let session = SessionId::parse(&session_id)
        .ok_or_else(|| AppError::InvalidPathSegment(session_id.clone()))?;
    if !is_valid_filename(&filename) {
        return Err(AppError::InvalidPathSegment(filename));
    }

    let file = match state.storage.open_output(&session, &filename).await {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(AppError::NotFound(format!("{session}/{filename}")));
        }
        Err(err) if err.kind() == io::ErrorKind::PermissionDenied => {
            tracing::warn!(session = %session, filename = %filename, "refused to serve: {err}");
            return Err(AppError::NotFound(format!("{session}/{filename}")));
        }
        Err(err) => return Err(err.into()),
    };
    let content_length = file.metadata().await?.len();
    let body = Body::from_stream(ReaderStream::new(file));

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(content_type(&filename))),
            (header::CONTENT_LENGTH, HeaderValue::from(content_length)),
            (header::CACHE_CONTROL, HeaderValue::from_static("no-cache")),
        ],
        body,
    ))
}

fn content_type(filename: &str) -> &'static str {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase());
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}
