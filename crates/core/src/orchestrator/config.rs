//! Orchestrator configuration.

use crate::archiver::ArchiverConfig;
use crate::converter::ConverterConfig;

/// Per-job settings the orchestrator needs from the other config sections.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Echo converter output into the service log.
    pub verbose: bool,
    /// File name of the per-job converter log.
    pub log_file_name: String,
    /// Converter output lines kept in memory per job.
    pub output_tail_lines: usize,
    /// File name of the download bundle inside the job directory.
    pub bundle_name: String,
}

impl OrchestratorConfig {
    pub fn new(verbose: bool, converter: &ConverterConfig, archiver: &ArchiverConfig) -> Self {
        Self {
            verbose,
            log_file_name: converter.log_file_name.clone(),
            output_tail_lines: converter.output_tail_lines,
            bundle_name: archiver.bundle_name.clone(),
        }
    }
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self::new(false, &ConverterConfig::default(), &ArchiverConfig::default())
    }
}
