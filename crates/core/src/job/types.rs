use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Generate a fresh opaque job identifier.
pub fn new_job_id() -> String {
    Uuid::new_v4().to_string()
}

/// Whether `id` has the shape of an identifier produced by [`new_job_id`].
///
/// Anything else is treated as an unknown job and must never be joined into a path.
pub fn is_valid_job_id(id: &str) -> bool {
    Uuid::parse_str(id).is_ok()
}

/// Lifecycle state of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Pending,
    Processing,
    Completed,
    Error,
}

impl JobState {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Pending => "pending",
            JobState::Processing => "processing",
            JobState::Completed => "completed",
            JobState::Error => "error",
        }
    }

    /// Terminal states are never left once reached.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Completed | JobState::Error)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Snapshot of a job's progress.
///
/// Snapshots are replaced wholesale on every transition, never edited in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStatus {
    pub status: JobState,
    pub message: String,
    /// Seconds since the Unix epoch of the transition that produced this snapshot.
    pub timestamp: i64,
    /// Number of movements produced. Only set on completion.
    #[serde(
        rename = "movementCount",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub movement_count: Option<usize>,
}

impl JobStatus {
    fn at_now(status: JobState, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            timestamp: Utc::now().timestamp(),
            movement_count: None,
        }
    }

    pub fn pending(message: impl Into<String>) -> Self {
        Self::at_now(JobState::Pending, message)
    }

    pub fn processing(message: impl Into<String>) -> Self {
        Self::at_now(JobState::Processing, message)
    }

    pub fn completed(message: impl Into<String>, movement_count: usize) -> Self {
        Self {
            movement_count: Some(movement_count),
            ..Self::at_now(JobState::Completed, message)
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::at_now(JobState::Error, message)
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
