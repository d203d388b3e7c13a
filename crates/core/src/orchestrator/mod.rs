//! Job orchestrator: owns the lifecycle of every conversion job.
//!
//! Each job moves through a linear state machine:
//! - **pending**: upload stored, background task launched
//! - **processing**: converter running
//! - **completed** / **error**: terminal, decided by whether any movements exist
//!
//! Only the job's own background task writes its status after submission.

mod config;
mod runner;
mod types;

pub use config::OrchestratorConfig;
pub use runner::{JobOrchestrator, PendingUpload};
pub use types::OrchestratorError;
