//! Error types for the archiver module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building a bundle.
#[derive(Debug, Error)]
pub enum ArchiverError {
    /// Archiver binary not found.
    #[error("archiver not found at path: {path}")]
    ProgramNotFound { path: PathBuf },

    /// Nothing to pack.
    #[error("no input files to archive")]
    NoInputs,

    /// The archiver ran and failed.
    #[error("archiver failed: {reason}")]
    Failed {
        reason: String,
        stderr: Option<String>,
    },

    /// I/O error while running the archiver.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ArchiverError {
    pub fn failed(reason: impl Into<String>, stderr: Option<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
            stderr,
        }
    }
}
