//! `zip` command based archiver.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use super::config::ArchiverConfig;
use super::error::ArchiverError;
use super::traits::Archiver;

/// Archiver that shells out to `zip -j`.
pub struct ZipArchiver {
    config: ArchiverConfig,
}

impl ZipArchiver {
    pub fn new(config: ArchiverConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(ArchiverConfig::default())
    }

    /// `-j` junks directory paths so the bundle is flat.
    fn build_args(target: &Path, sources: &[PathBuf]) -> Vec<String> {
        let mut args = vec!["-j".to_string(), target.to_string_lossy().to_string()];
        args.extend(sources.iter().map(|p| p.to_string_lossy().to_string()));
        args
    }
}

#[async_trait]
impl Archiver for ZipArchiver {
    fn name(&self) -> &str {
        "zip"
    }

    async fn archive(&self, target: &Path, sources: &[PathBuf]) -> Result<(), ArchiverError> {
        if sources.is_empty() {
            return Err(ArchiverError::NoInputs);
        }

        // zip updates an existing archive in place; start fresh so the bundle holds
        // exactly the current inputs.
        match tokio::fs::remove_file(target).await {
            Ok(()) => debug!("Removed stale bundle {:?}", target),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(ArchiverError::Io(e)),
        }

        let output = Command::new(&self.config.program)
            .args(Self::build_args(target, sources))
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ArchiverError::ProgramNotFound {
                        path: self.config.program.clone(),
                    }
                } else {
                    ArchiverError::Io(e)
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(ArchiverError::failed(
                format!("zip exited with code: {:?}", output.status.code()),
                if stderr.is_empty() { None } else { Some(stderr) },
            ));
        }

        Ok(())
    }
}
