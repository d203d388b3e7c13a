//! Audiveris batch converter launched through Gradle.

use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, warn};

use super::args::{batch_args, escape_args};
use super::config::ConverterConfig;
use super::error::ConverterError;
use super::sink::OutputSink;
use super::traits::Converter;
use super::types::{ConversionExit, ConversionJob};

/// Runs `gradle run` inside an Audiveris checkout for every job.
pub struct AudiverisConverter {
    config: ConverterConfig,
}

impl AudiverisConverter {
    /// Creates a new converter with the given configuration.
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    /// Creates a converter with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ConverterConfig::default())
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Builds the full program argument list for a job.
    ///
    /// The program runs in its own working directory, so both paths are made
    /// absolute first.
    fn build_args(&self, job: &ConversionJob) -> Result<Vec<String>, ConverterError> {
        let output_dir = std::path::absolute(&job.output_dir)?;
        let input_path = std::path::absolute(&job.input_path)?;

        Ok(vec![
            "run".to_string(),
            format!("-PjvmLineArgs={}", self.config.jvm_args),
            format!(
                "-PcmdLineArgs={}",
                escape_args(&batch_args(&output_dir, &input_path))
            ),
        ])
    }

    fn spawn_error(&self, e: std::io::Error) -> ConverterError {
        if e.kind() != std::io::ErrorKind::NotFound {
            return ConverterError::Io(e);
        }
        if !self.config.working_dir.is_dir() {
            ConverterError::WorkingDirMissing {
                path: self.config.working_dir.clone(),
            }
        } else {
            ConverterError::ProgramNotFound {
                path: self.config.program.clone(),
            }
        }
    }
}

#[async_trait]
impl Converter for AudiverisConverter {
    fn name(&self) -> &str {
        "audiveris"
    }

    async fn convert(
        &self,
        job: &ConversionJob,
        sink: OutputSink,
    ) -> Result<ConversionExit, ConverterError> {
        let args = self.build_args(job)?;
        debug!(
            "Launching {:?} {:?} in {:?} for job {}",
            self.config.program, args, self.config.working_dir, job.job_id
        );

        let mut child = Command::new(&self.config.program)
            .args(&args)
            .current_dir(&self.config.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let pump_stdout = async {
            if let Some(out) = stdout {
                sink.pump(out).await;
            }
        };
        let pump_stderr = async {
            if let Some(err) = stderr {
                sink.pump(err).await;
            }
        };

        // No timeout: the converter runs until it exits on its own.
        let (_, _, status) = tokio::join!(pump_stdout, pump_stderr, child.wait());
        let status = status?;

        if let Err(e) = sink.flush().await {
            warn!("Failed to flush conversion log for job {}: {}", job.job_id, e);
        }

        Ok(ConversionExit {
            code: status.code(),
            output_tail: sink.tail().await,
        })
    }

    async fn validate(&self) -> Result<(), ConverterError> {
        if !self.config.working_dir.is_dir() {
            return Err(ConverterError::WorkingDirMissing {
                path: self.config.working_dir.clone(),
            });
        }

        // Bare names are resolved through PATH at launch time.
        let program = &self.config.program;
        if program.components().count() > 1 && !program.exists() {
            return Err(ConverterError::ProgramNotFound {
                path: program.clone(),
            });
        }

        Ok(())
    }
}
