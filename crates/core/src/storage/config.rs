//! Storage configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Locations and file naming of the storage areas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding uploaded input files.
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,

    /// Directory holding one output subdirectory per job.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Required extension of uploaded files, without the dot.
    #[serde(default = "default_upload_extension")]
    pub upload_extension: String,

    /// Extension of the files the converter produces, without the dot.
    #[serde(default = "default_artifact_extension")]
    pub artifact_extension: String,
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("/tmp/uploads")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("/tmp/downloads")
}

fn default_upload_extension() -> String {
    "pdf".to_string()
}

fn default_artifact_extension() -> String {
    "mxl".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: default_upload_dir(),
            output_dir: default_output_dir(),
            upload_extension: default_upload_extension(),
            artifact_extension: default_artifact_extension(),
        }
    }
}

impl StorageConfig {
    /// Creates a config rooted at the given directories with default extensions.
    pub fn with_dirs(upload_dir: PathBuf, output_dir: PathBuf) -> Self {
        Self {
            upload_dir,
            output_dir,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StorageConfig::default();
        assert_eq!(config.upload_dir, PathBuf::from("/tmp/uploads"));
        assert_eq!(config.output_dir, PathBuf::from("/tmp/downloads"));
        assert_eq!(config.upload_extension, "pdf");
        assert_eq!(config.artifact_extension, "mxl");
    }

    #[test]
    fn test_deserialize_partial() {
        let toml = r#"
            upload_dir = "/srv/in"
        "#;
        let config: StorageConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.upload_dir, PathBuf::from("/srv/in"));
        assert_eq!(config.output_dir, PathBuf::from("/tmp/downloads"));
    }
}
