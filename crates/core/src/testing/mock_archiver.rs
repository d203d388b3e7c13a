//! Mock archiver for testing.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::archiver::{Archiver, ArchiverError};

/// A recorded archive call for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedArchive {
    pub target: PathBuf,
    pub sources: Vec<PathBuf>,
}

/// Mock implementation of the Archiver trait.
///
/// Writes a small fake bundle listing the source file names, one per line, after a
/// `PK` marker. No external program is run.
#[derive(Debug, Clone, Default)]
pub struct MockArchiver {
    archives: Arc<RwLock<Vec<RecordedArchive>>>,
    /// If set, the next call fails.
    fail_next: Arc<RwLock<bool>>,
}

impl MockArchiver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `archive` call fail.
    pub async fn fail_next(&self) {
        *self.fail_next.write().await = true;
    }

    /// Calls received so far, in order.
    pub async fn recorded_archives(&self) -> Vec<RecordedArchive> {
        self.archives.read().await.clone()
    }
}

#[async_trait]
impl Archiver for MockArchiver {
    fn name(&self) -> &str {
        "mock"
    }

    async fn archive(&self, target: &Path, sources: &[PathBuf]) -> Result<(), ArchiverError> {
        self.archives.write().await.push(RecordedArchive {
            target: target.to_path_buf(),
            sources: sources.to_vec(),
        });

        {
            let mut fail_next = self.fail_next.write().await;
            if *fail_next {
                *fail_next = false;
                return Err(ArchiverError::failed("mock archive failure", None));
            }
        }
        if sources.is_empty() {
            return Err(ArchiverError::NoInputs);
        }

        let mut contents = String::from("PK\n");
        for source in sources {
            let name = source
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            contents.push_str(&name);
            contents.push('\n');
        }
        tokio::fs::write(target, contents).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_writes_flat_listing() {
        let temp = TempDir::new().unwrap();
        let archiver = MockArchiver::new();
        let target = temp.path().join("bundle.zip");

        archiver
            .archive(&target, &[PathBuf::from("/a/b/movement-1.mxl")])
            .await
            .unwrap();

        assert_eq!(std::fs::read_to_string(&target).unwrap(), "PK\nmovement-1.mxl\n");
        assert_eq!(archiver.recorded_archives().await.len(), 1);
    }

    #[tokio::test]
    async fn test_fail_next_only_once() {
        let temp = TempDir::new().unwrap();
        let archiver = MockArchiver::new();
        let target = temp.path().join("bundle.zip");
        let sources = [PathBuf::from("movement-1.mxl")];

        archiver.fail_next().await;
        assert!(archiver.archive(&target, &sources).await.is_err());
        assert!(archiver.archive(&target, &sources).await.is_ok());
    }
}
