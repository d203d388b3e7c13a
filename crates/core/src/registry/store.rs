//! Job registry trait.

use crate::job::JobStatus;

/// Concurrent key/value store of job status snapshots.
///
/// Implementations synchronize internally; callers never see a lock. Entries live
/// for the lifetime of the registry.
pub trait JobRegistry: Send + Sync {
    /// Create or replace the snapshot for `id`.
    fn put(&self, id: &str, status: JobStatus);

    /// Latest snapshot for `id`, or `None` if the id was never registered.
    fn get(&self, id: &str) -> Option<JobStatus>;

    /// Number of known jobs.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
