//! Types for the job orchestrator.

use thiserror::Error;

use crate::archiver::ArchiverError;

/// Errors returned to callers of the orchestrator.
///
/// Failures inside a running job are never returned; they end up in the job's status.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Uploaded filename lacks the required extension.
    #[error("only .{expected} files are allowed")]
    InvalidExtension { expected: String },

    /// Upload could not be written or a job directory could not be read.
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Id is malformed or was never issued.
    #[error("job not found: {0}")]
    JobNotFound(String),

    /// Job directory holds no movements (yet).
    #[error("no movements found for job {0}")]
    NoArtifacts(String),

    /// Bundle could not be built.
    #[error("failed to create archive: {0}")]
    Archive(#[from] ArchiverError),
}
