//! Mock converter for testing.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::converter::{ConversionExit, ConversionJob, Converter, ConverterError, OutputSink};

/// Mock implementation of the Converter trait.
///
/// Provides controllable behavior for testing:
/// - Produce a fixed number of movement files
/// - Report any exit code
/// - Fail to launch
/// - Take a while to finish
///
/// # Example
///
/// ```rust,ignore
/// use partitura_core::testing::MockConverter;
///
/// let converter = MockConverter::new().with_movements(2).with_exit_code(1);
///
/// // ... submit a job through the orchestrator ...
///
/// let jobs = converter.recorded_jobs().await;
/// assert_eq!(jobs.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MockConverter {
    /// Movement files written into the job directory.
    movements: usize,
    /// Reported exit code.
    exit_code: i32,
    /// Fail before "launching".
    fail_launch: bool,
    /// Simulated conversion duration.
    delay: Duration,
    /// Every job passed to `convert`.
    jobs: Arc<RwLock<Vec<ConversionJob>>>,
}

impl Default for MockConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConverter {
    /// Create a mock that exits cleanly without producing anything.
    pub fn new() -> Self {
        Self {
            movements: 0,
            exit_code: 0,
            fail_launch: false,
            delay: Duration::ZERO,
            jobs: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn with_movements(mut self, movements: usize) -> Self {
        self.movements = movements;
        self
    }

    pub fn with_exit_code(mut self, exit_code: i32) -> Self {
        self.exit_code = exit_code;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn failing_to_start(mut self) -> Self {
        self.fail_launch = true;
        self
    }

    /// Jobs received so far, in call order.
    pub async fn recorded_jobs(&self) -> Vec<ConversionJob> {
        self.jobs.read().await.clone()
    }
}

#[async_trait]
impl Converter for MockConverter {
    fn name(&self) -> &str {
        "mock"
    }

    async fn convert(
        &self,
        job: &ConversionJob,
        sink: OutputSink,
    ) -> Result<ConversionExit, ConverterError> {
        self.jobs.write().await.push(job.clone());

        if self.fail_launch {
            return Err(ConverterError::ProgramNotFound {
                path: PathBuf::from("mock-converter"),
            });
        }

        sink.write_line(&format!("converting {}", job.input_path.display()))
            .await?;
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        for i in 1..=self.movements {
            let path = job.output_dir.join(format!("movement-{}.mxl", i));
            tokio::fs::write(&path, format!("movement {}", i)).await?;
            sink.write_line(&format!("exported {}", path.display())).await?;
        }
        if self.exit_code != 0 {
            sink.write_line(&format!("exiting with {}", self.exit_code))
                .await?;
        }
        sink.flush().await?;

        Ok(ConversionExit {
            code: Some(self.exit_code),
            output_tail: sink.tail().await,
        })
    }

    async fn validate(&self) -> Result<(), ConverterError> {
        Ok(())
    }
}
