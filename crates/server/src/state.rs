use std::sync::Arc;
use partitura_core::{Config, JobOrchestrator, JobRegistry};

/// Shared application state
pub struct AppState {
    config: Config,
    registry: Arc<dyn JobRegistry>,
    orchestrator: Arc<JobOrchestrator>,
}

impl AppState {
    pub fn new(
        config: Config,
        registry: Arc<dyn JobRegistry>,
        orchestrator: Arc<JobOrchestrator>,
    ) -> Self {
        Self {
            config,
            registry,
            orchestrator,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &dyn JobRegistry {
        self.registry.as_ref()
    }

    pub fn orchestrator(&self) -> &JobOrchestrator {
        &self.orchestrator
    }
}
