//! Path derivation for the storage areas.

use std::io;
use std::path::{Path, PathBuf};

use super::config::StorageConfig;

/// Resolves every on-disk location from a job id.
///
/// Paths are derived from the id alone; client supplied names never reach the
/// filesystem.
#[derive(Debug, Clone)]
pub struct StorageLayout {
    config: StorageConfig,
}

impl StorageLayout {
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    pub fn upload_dir(&self) -> &Path {
        &self.config.upload_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.config.output_dir
    }

    /// Create both storage roots if they are missing.
    pub async fn ensure_roots(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.config.upload_dir).await?;
        tokio::fs::create_dir_all(&self.config.output_dir).await?;
        Ok(())
    }

    /// Whether a client supplied filename carries the required upload extension.
    pub fn accepts_upload(&self, filename: &str) -> bool {
        Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.config.upload_extension))
    }

    /// Whether a stored file is an upload (by its extension).
    pub fn is_upload_file(&self, path: &Path) -> bool {
        has_extension(path, &self.config.upload_extension)
    }

    /// Whether a file in a job directory is a produced movement.
    pub fn is_artifact(&self, path: &Path) -> bool {
        has_extension(path, &self.config.artifact_extension)
    }

    pub fn upload_path(&self, id: &str) -> PathBuf {
        self.config
            .upload_dir
            .join(format!("{}.{}", id, self.config.upload_extension))
    }

    pub fn job_dir(&self, id: &str) -> PathBuf {
        self.config.output_dir.join(id)
    }

    pub fn job_file(&self, id: &str, name: &str) -> PathBuf {
        self.job_dir(id).join(name)
    }

    /// Movements currently present in a job directory, sorted by path.
    ///
    /// A missing job directory yields an empty list.
    pub async fn list_artifacts(&self, id: &str) -> io::Result<Vec<PathBuf>> {
        let mut entries = match tokio::fs::read_dir(self.job_dir(id)).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let mut artifacts = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if entry.file_type().await?.is_file() && self.is_artifact(&path) {
                artifacts.push(path);
            }
        }
        artifacts.sort();
        Ok(artifacts)
    }
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some(extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn layout_in(temp: &TempDir) -> StorageLayout {
        StorageLayout::new(StorageConfig::with_dirs(
            temp.path().join("uploads"),
            temp.path().join("downloads"),
        ))
    }

    #[test]
    fn test_accepts_upload() {
        let layout = StorageLayout::new(StorageConfig::default());
        assert!(layout.accepts_upload("score.pdf"));
        assert!(layout.accepts_upload("Score.PDF"));
        assert!(layout.accepts_upload("my score, op. 2.pdf"));
        assert!(!layout.accepts_upload("score.png"));
        assert!(!layout.accepts_upload("pdf"));
        assert!(!layout.accepts_upload("score.pdf.exe"));
        assert!(!layout.accepts_upload(""));
    }

    #[test]
    fn test_paths_derive_from_id_only() {
        let layout = StorageLayout::new(StorageConfig::default());
        assert_eq!(
            layout.upload_path("abc"),
            PathBuf::from("/tmp/uploads/abc.pdf")
        );
        assert_eq!(layout.job_dir("abc"), PathBuf::from("/tmp/downloads/abc"));
        assert_eq!(
            layout.job_file("abc", "conversion.log"),
            PathBuf::from("/tmp/downloads/abc/conversion.log")
        );
    }

    #[tokio::test]
    async fn test_ensure_roots_creates_directories() {
        let temp = TempDir::new().unwrap();
        let layout = layout_in(&temp);

        layout.ensure_roots().await.unwrap();

        assert!(layout.upload_dir().is_dir());
        assert!(layout.output_dir().is_dir());
    }

    #[tokio::test]
    async fn test_list_artifacts_missing_dir_is_empty() {
        let temp = TempDir::new().unwrap();
        let layout = layout_in(&temp);

        let artifacts = layout.list_artifacts("nope").await.unwrap();
        assert!(artifacts.is_empty());
    }

    #[tokio::test]
    async fn test_list_artifacts_filters_by_extension() {
        let temp = TempDir::new().unwrap();
        let layout = layout_in(&temp);
        let dir = layout.job_dir("job");
        std::fs::create_dir_all(dir.join("nested.mxl")).unwrap();
        std::fs::write(dir.join("b.mxl"), b"b").unwrap();
        std::fs::write(dir.join("a.mxl"), b"a").unwrap();
        std::fs::write(dir.join("conversion.log"), b"log").unwrap();
        std::fs::write(dir.join("converted.zip"), b"zip").unwrap();

        let artifacts = layout.list_artifacts("job").await.unwrap();
        assert_eq!(artifacts, vec![dir.join("a.mxl"), dir.join("b.mxl")]);
    }
}
