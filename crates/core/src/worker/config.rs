//! Job worker configuration.

use serde::{Deserialize, Serialize};

/// Limits for background job tasks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobsConfig {
    /// Maximum conversions running at once. 0 means unlimited.
    #[serde(default)]
    pub max_concurrent: usize,
}

impl JobsConfig {
    pub fn limit(&self) -> Option<usize> {
        (self.max_concurrent > 0).then_some(self.max_concurrent)
    }
}
