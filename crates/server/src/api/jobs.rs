//! Upload, status polling and bundle download.

use axum::{
    body::Body,
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use tokio_util::io::ReaderStream;
use tracing::{error, warn};

use partitura_core::{JobStatus, OrchestratorError};

use crate::state::AppState;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub id: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
}

impl From<OrchestratorError> for ErrorResponse {
    fn from(e: OrchestratorError) -> Self {
        Self {
            error: e.to_string(),
        }
    }
}

fn orchestrator_error(e: OrchestratorError) -> ApiError {
    let status = match &e {
        OrchestratorError::InvalidExtension { .. } => StatusCode::BAD_REQUEST,
        OrchestratorError::JobNotFound(_) | OrchestratorError::NoArtifacts(_) => {
            StatusCode::NOT_FOUND
        }
        OrchestratorError::Storage(_) | OrchestratorError::Archive(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(e.into()))
}

// ============================================================================
// Handlers
// ============================================================================

/// `POST /upload` with a multipart `file` field.
///
/// The file is streamed to the upload area chunk by chunk.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    loop {
        let mut field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return Err(api_error(
                    StatusCode::BAD_REQUEST,
                    format!("Failed to read upload: {}", e),
                ))
            }
        };
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let mut upload = state
            .orchestrator()
            .begin_upload(&filename)
            .await
            .map_err(orchestrator_error)?;

        loop {
            match field.chunk().await {
                Ok(Some(chunk)) => {
                    if let Err(e) = upload.write_chunk(&chunk).await {
                        upload.abort().await;
                        return Err(orchestrator_error(e));
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    upload.abort().await;
                    return Err(api_error(
                        StatusCode::BAD_REQUEST,
                        format!("Failed to read file: {}", e),
                    ));
                }
            }
        }

        let id = state
            .orchestrator()
            .start(upload)
            .await
            .map_err(orchestrator_error)?;
        return Ok(Json(UploadResponse { id }));
    }

    Err(api_error(StatusCode::BAD_REQUEST, "No file uploaded"))
}

/// `GET /status/{id}`: the job's latest status record.
pub async fn status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<JobStatus>, ApiError> {
    match state.orchestrator().status(&id) {
        Some(status) => Ok(Json(status)),
        None => Err(api_error(StatusCode::NOT_FOUND, "Job not found")),
    }
}

/// `GET /download/{id}`: bundle the job's movements and stream the archive.
pub async fn download(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let bundle = state
        .orchestrator()
        .bundle(&id)
        .await
        .map_err(orchestrator_error)?;

    // The sweeper may remove the job directory between bundling and opening.
    let file = match tokio::fs::File::open(&bundle).await {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(job_id = %id, "Bundle disappeared before it could be sent");
            return Err(api_error(StatusCode::NOT_FOUND, "Bundle not found"));
        }
        Err(e) => {
            error!(job_id = %id, "Failed to open bundle {:?}: {}", bundle, e);
            return Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to open archive: {}", e),
            ));
        }
    };

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/zip")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}.zip\"", id),
        );
    if let Ok(metadata) = file.metadata().await {
        builder = builder.header(header::CONTENT_LENGTH, metadata.len());
    }

    builder
        .body(Body::from_stream(ReaderStream::new(file)))
        .map_err(|e| {
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Response build failed: {}", e),
            )
        })
}
