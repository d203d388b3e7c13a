//! Trait definitions for the archiver module.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use super::error::ArchiverError;

/// Packs files into a single bundle.
#[async_trait]
pub trait Archiver: Send + Sync {
    /// Returns the name of this archiver implementation.
    fn name(&self) -> &str;

    /// Writes `sources`, in order and without directory components, into `target`.
    ///
    /// On error the target must not be served.
    async fn archive(&self, target: &Path, sources: &[PathBuf]) -> Result<(), ArchiverError>;
}
