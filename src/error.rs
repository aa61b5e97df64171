use std::io;

use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::remover::RemoverError;

/// Failure of one file inside the processing pipeline.
#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("failed to read upload: {0}")]
    Read(#[source] io::Error),

    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("background removal failed: {0}")]
    Remove(#[from] RemoverError),

    #[error("failed to encode image: {0}")]
    Encode(#[source] image::ImageError),

    #[error("failed to write output: {0}")]
    Write(#[source] io::Error),
}

#[derive(Error, Debug)]
pub enum AppError {
    // Client errors
    #[error("No files part in the request")]
    NoFilesPart,

    #[error("No files uploaded")]
    NoFilesUploaded,

    #[error("{}", multipart_message(.0))]
    Multipart(#[from] MultipartError),

    #[error("Invalid path segment: {0}")]
    InvalidPathSegment(String),

    #[error("{0} not found")]
    NotFound(String),

    // Batch failures
    #[error("Error processing {filename}: {source}")]
    Processing {
        filename: String,
        #[source]
        source: ProcessingError,
    },

    // Internal errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Task error: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NoFilesPart | Self::NoFilesUploaded | Self::InvalidPathSegment(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Multipart(err) => err.status(),
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Processing { .. } | Self::Io(_) | Self::Join(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

fn multipart_message(err: &MultipartError) -> String {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        "Request body exceeds the upload size limit".to_string()
    } else {
        format!("Malformed multipart body: {}", err.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        if status_code.is_server_error() {
            tracing::error!("Generating response for AppError: {:?}", self);
        } else {
            tracing::debug!("Generating response for AppError: {}", self);
        }

        (status_code, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
