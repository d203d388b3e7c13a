//! In-memory registry backed by a sharded concurrent map.

use dashmap::DashMap;

use super::store::JobRegistry;
use crate::job::JobStatus;

/// Registry kept in process memory. Lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryJobRegistry {
    jobs: DashMap<String, JobStatus>,
}

impl InMemoryJobRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

impl JobRegistry for InMemoryJobRegistry {
    fn put(&self, id: &str, status: JobStatus) {
        self.jobs.insert(id.to_string(), status);
    }

    fn get(&self, id: &str) -> Option<JobStatus> {
        self.jobs.get(id).map(|entry| entry.value().clone())
    }

    fn len(&self) -> usize {
        self.jobs.len()
    }
}
