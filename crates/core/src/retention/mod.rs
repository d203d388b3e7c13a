//! Time based garbage collection of the storage areas.
//!
//! One sweep walks both areas independently:
//! - uploads older than the TTL are deleted file by file;
//! - a job directory is deleted as a whole as soon as any file directly inside it
//!   is older than the TTL.
//!
//! Job records in the registry are left untouched.

mod config;
mod sweeper;

pub use config::RetentionConfig;
pub use sweeper::{RetentionSweeper, SweepReport};
