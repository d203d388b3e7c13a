pub mod archiver;
pub mod config;
pub mod converter;
pub mod job;
pub mod metrics;
pub mod orchestrator;
pub mod registry;
pub mod retention;
pub mod storage;
pub mod testing;
pub mod worker;

pub use archiver::{Archiver, ArchiverConfig, ArchiverError, ZipArchiver};
pub use config::{
    load_config, load_config_from_str, load_config_or_default, validate_config, Config,
    ConfigError, ServerConfig,
};
pub use converter::{AudiverisConverter, Converter, ConverterConfig, ConverterError};
pub use job::{JobState, JobStatus};
pub use orchestrator::{JobOrchestrator, OrchestratorConfig, OrchestratorError, PendingUpload};
pub use registry::{InMemoryJobRegistry, JobRegistry};
pub use retention::{RetentionConfig, RetentionSweeper, SweepReport};
pub use storage::{StorageConfig, StorageLayout};
pub use worker::{JobSpawner, JobsConfig};
