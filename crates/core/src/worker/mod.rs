//! Supervised background tasks, one per job.
//!
//! Every accepted upload runs as its own tokio task. The spawner optionally caps how
//! many of them run at once and watches each task's `JoinHandle` so a panic ends up as
//! an `error` status in the registry instead of disappearing.

mod config;
mod spawner;

pub use config::JobsConfig;
pub use spawner::JobSpawner;
