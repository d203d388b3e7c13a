//! Configuration for the archiver module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the external archiver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiverConfig {
    /// Path to the zip binary.
    #[serde(default = "default_program")]
    pub program: PathBuf,

    /// File name of the bundle inside the job directory.
    #[serde(default = "default_bundle_name")]
    pub bundle_name: String,
}

fn default_program() -> PathBuf {
    PathBuf::from("zip")
}

fn default_bundle_name() -> String {
    "converted.zip".to_string()
}

impl Default for ArchiverConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            bundle_name: default_bundle_name(),
        }
    }
}
