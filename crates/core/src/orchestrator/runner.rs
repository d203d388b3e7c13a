//! Job orchestrator implementation.
//!
//! Submission stores the upload and returns at once; conversion happens in a
//! supervised background task per job.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tokio::io::AsyncWriteExt;
use tracing::{debug, error, info, warn};

use crate::archiver::Archiver;
use crate::converter::{ConversionJob, Converter, OutputSink};
use crate::job::{is_valid_job_id, new_job_id, JobStatus};
use crate::metrics::{BUNDLES_BUILT, CONVERSION_DURATION, JOBS_FINISHED, JOBS_SUBMITTED};
use crate::registry::JobRegistry;
use crate::storage::StorageLayout;
use crate::worker::JobSpawner;

use super::config::OrchestratorConfig;
use super::types::OrchestratorError;

/// The job orchestrator - accepts uploads and drives each job to a terminal state.
pub struct JobOrchestrator {
    config: OrchestratorConfig,
    layout: StorageLayout,
    registry: Arc<dyn JobRegistry>,
    converter: Arc<dyn Converter>,
    archiver: Arc<dyn Archiver>,
    spawner: JobSpawner,
}

impl JobOrchestrator {
    /// Create a new orchestrator.
    pub fn new(
        config: OrchestratorConfig,
        layout: StorageLayout,
        registry: Arc<dyn JobRegistry>,
        converter: Arc<dyn Converter>,
        archiver: Arc<dyn Archiver>,
        spawner: JobSpawner,
    ) -> Self {
        Self {
            config,
            layout,
            registry,
            converter,
            archiver,
            spawner,
        }
    }

    pub fn layout(&self) -> &StorageLayout {
        &self.layout
    }

    /// Background job tasks not yet finished.
    pub fn active_jobs(&self) -> usize {
        self.spawner.active()
    }

    /// Accept an upload and start converting it.
    ///
    /// The stored file name is derived from the new job id only. Returns the id
    /// without waiting for the conversion.
    pub async fn submit(&self, filename: &str, data: &[u8]) -> Result<String, OrchestratorError> {
        let mut upload = self.begin_upload(filename).await?;
        if let Err(e) = upload.write_chunk(data).await {
            upload.abort().await;
            return Err(e);
        }
        self.start(upload).await
    }

    /// Validate `filename` and open the upload file for a new job.
    ///
    /// The job exists only once the returned upload is passed to [`Self::start`].
    pub async fn begin_upload(&self, filename: &str) -> Result<PendingUpload, OrchestratorError> {
        if !self.layout.accepts_upload(filename) {
            return Err(OrchestratorError::InvalidExtension {
                expected: self.layout.config().upload_extension.clone(),
            });
        }

        let job_id = new_job_id();
        let path = self.layout.upload_path(&job_id);
        let file = tokio::fs::File::create(&path).await.map_err(|e| {
            error!("Failed to create upload {:?}: {}", path, e);
            OrchestratorError::Storage(e)
        })?;

        Ok(PendingUpload {
            job_id,
            filename: filename.to_string(),
            path,
            file,
            bytes: 0,
        })
    }

    /// Register the job for a fully written upload and launch its task.
    pub async fn start(&self, mut upload: PendingUpload) -> Result<String, OrchestratorError> {
        if let Err(e) = upload.file.flush().await {
            error!("Failed to store upload {:?}: {}", upload.path, e);
            upload.abort().await;
            return Err(OrchestratorError::Storage(e));
        }

        let PendingUpload {
            job_id,
            filename,
            path: input_path,
            bytes,
            ..
        } = upload;

        self.registry
            .put(&job_id, JobStatus::pending("uploaded, starting conversion"));
        JOBS_SUBMITTED.inc();
        info!(job_id = %job_id, "Accepted upload {:?} ({} bytes)", filename, bytes);

        let task = JobTask {
            job_id: job_id.clone(),
            input_path,
            config: self.config.clone(),
            layout: self.layout.clone(),
            registry: Arc::clone(&self.registry),
            converter: Arc::clone(&self.converter),
        };
        self.spawner.spawn(job_id.clone(), task.run());

        Ok(job_id)
    }

    /// Latest status of a job, or `None` if the id was never issued.
    pub fn status(&self, job_id: &str) -> Option<JobStatus> {
        if !is_valid_job_id(job_id) {
            return None;
        }
        self.registry.get(job_id)
    }

    /// Build the download bundle for a job and return its path.
    ///
    /// Rebuilt on every call from the movements currently on disk.
    pub async fn bundle(&self, job_id: &str) -> Result<PathBuf, OrchestratorError> {
        if !is_valid_job_id(job_id) {
            return Err(OrchestratorError::JobNotFound(job_id.to_string()));
        }

        let artifacts = self.layout.list_artifacts(job_id).await?;
        if artifacts.is_empty() {
            return Err(OrchestratorError::NoArtifacts(job_id.to_string()));
        }

        let target = self.layout.job_file(job_id, &self.config.bundle_name);
        debug!(
            job_id = %job_id,
            "Bundling {} movements with {}",
            artifacts.len(),
            self.archiver.name()
        );

        match self.archiver.archive(&target, &artifacts).await {
            Ok(()) => {
                BUNDLES_BUILT.with_label_values(&["success"]).inc();
                Ok(target)
            }
            Err(e) => {
                BUNDLES_BUILT.with_label_values(&["failed"]).inc();
                warn!(job_id = %job_id, "Failed to build bundle: {}", e);
                Err(OrchestratorError::Archive(e))
            }
        }
    }
}

/// An upload being written to the upload area. No job exists for it yet.
pub struct PendingUpload {
    job_id: String,
    filename: String,
    path: PathBuf,
    file: tokio::fs::File,
    bytes: u64,
}

impl PendingUpload {
    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    /// Bytes written so far.
    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    /// Append the next piece of the uploaded file.
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> Result<(), OrchestratorError> {
        self.file.write_all(chunk).await.map_err(|e| {
            error!("Failed to store upload {:?}: {}", self.path, e);
            OrchestratorError::Storage(e)
        })?;
        self.bytes += chunk.len() as u64;
        Ok(())
    }

    /// Discard the partial upload.
    pub async fn abort(self) {
        drop(self.file);
        if let Err(e) = tokio::fs::remove_file(&self.path).await {
            warn!("Failed to remove partial upload {:?}: {}", self.path, e);
        }
    }
}

/// Everything one background job needs, owned by its task.
struct JobTask {
    job_id: String,
    input_path: PathBuf,
    config: OrchestratorConfig,
    layout: StorageLayout,
    registry: Arc<dyn JobRegistry>,
    converter: Arc<dyn Converter>,
}

impl JobTask {
    async fn run(self) {
        info!(job_id = %self.job_id, "START processing");
        let (status, outcome) = self.process().await;

        JOBS_FINISHED.with_label_values(&[outcome.label()]).inc();
        info!(job_id = %self.job_id, "END processing: {}", status.message);

        self.registry.put(&self.job_id, status);
    }

    /// Runs every phase and returns the terminal status.
    async fn process(&self) -> (JobStatus, Outcome) {
        let output_dir = self.layout.job_dir(&self.job_id);
        if let Err(e) = tokio::fs::create_dir_all(&output_dir).await {
            return self.fail(format!("failed to create output directory: {}", e));
        }

        self.registry
            .put(&self.job_id, JobStatus::processing("converting"));

        let log_path = output_dir.join(&self.config.log_file_name);
        let log = match tokio::fs::File::create(&log_path).await {
            Ok(file) => file,
            Err(e) => return self.fail(format!("failed to create log file: {}", e)),
        };
        let sink = OutputSink::new(
            &self.job_id,
            log,
            self.config.verbose,
            self.config.output_tail_lines,
        );

        let job = ConversionJob {
            job_id: self.job_id.clone(),
            input_path: self.input_path.clone(),
            output_dir,
        };

        let started = Instant::now();
        let exit = match self.converter.convert(&job, sink).await {
            Ok(exit) => exit,
            Err(e) => return self.fail(format!("failed to start converter: {}", e)),
        };
        let exit_error = exit.error_detail();
        CONVERSION_DURATION
            .with_label_values(&[if exit_error.is_some() { "exit_error" } else { "success" }])
            .observe(started.elapsed().as_secs_f64());

        if let Some(detail) = &exit_error {
            warn!(job_id = %self.job_id, "Converter reported an error: {}", detail);
            for line in &exit.output_tail {
                debug!(job_id = %self.job_id, "converter: {}", line);
            }
        }

        let movements = match self.layout.list_artifacts(&self.job_id).await {
            Ok(movements) => movements.len(),
            Err(e) => {
                warn!(job_id = %self.job_id, "Failed to list movements: {}", e);
                0
            }
        };

        match (movements, exit_error) {
            (0, None) => (
                JobStatus::error("conversion failed - no movements generated"),
                Outcome::Failed,
            ),
            (0, Some(detail)) => (
                JobStatus::error(format!(
                    "conversion failed - no movements generated (exec error: {})",
                    detail
                )),
                Outcome::Failed,
            ),
            (n, None) => (JobStatus::completed("completed", n), Outcome::Completed),
            (n, Some(detail)) => (
                JobStatus::completed(format!("completed with errors ({})", detail), n),
                Outcome::CompletedWithErrors,
            ),
        }
    }

    fn fail(&self, message: String) -> (JobStatus, Outcome) {
        error!(job_id = %self.job_id, "{}", message);
        (JobStatus::error(message), Outcome::Failed)
    }
}

/// How a job ended, for the `jobs_finished_total` result label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Completed,
    CompletedWithErrors,
    Failed,
}

impl Outcome {
    fn label(self) -> &'static str {
        match self {
            Outcome::Completed => "completed",
            Outcome::CompletedWithErrors => "completed_with_errors",
            Outcome::Failed => "error",
        }
    }
}
