//! Error types for the converter module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that prevent the converter from running at all.
///
/// A converter that runs and exits non-zero is not an error; see
/// [`ConversionExit`](super::ConversionExit).
#[derive(Debug, Error)]
pub enum ConverterError {
    /// Converter program not found.
    #[error("converter program not found: {path}")]
    ProgramNotFound { path: PathBuf },

    /// Working directory missing.
    #[error("converter working directory not found: {path}")]
    WorkingDirMissing { path: PathBuf },

    /// I/O error while launching or waiting for the process.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
