//! Job data model.
//!
//! A job is one upload-to-download unit of work. Its progress is published as a
//! sequence of immutable [`JobStatus`] snapshots:
//!
//! ```text
//! pending -> processing -> completed
//!                       \-> error
//! ```
//!
//! Setup failures may also jump straight from `pending` to `error`.

mod types;

pub use types::{is_valid_job_id, new_job_id, JobState, JobStatus};
