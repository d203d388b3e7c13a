//! Configuration for the converter module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the Audiveris batch converter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// Program used to launch the converter.
    #[serde(default = "default_program")]
    pub program: PathBuf,

    /// Directory the program runs in (the Audiveris checkout).
    #[serde(default = "default_working_dir")]
    pub working_dir: PathBuf,

    /// JVM options passed through `-PjvmLineArgs`.
    #[serde(default = "default_jvm_args")]
    pub jvm_args: String,

    /// Name of the per-job log file inside the job directory.
    #[serde(default = "default_log_file_name")]
    pub log_file_name: String,

    /// Number of trailing output lines kept in memory for diagnostics.
    #[serde(default = "default_output_tail_lines")]
    pub output_tail_lines: usize,
}

fn default_program() -> PathBuf {
    PathBuf::from("gradle")
}

fn default_working_dir() -> PathBuf {
    PathBuf::from("./audiveris")
}

fn default_jvm_args() -> String {
    "-Xmx3g".to_string()
}

fn default_log_file_name() -> String {
    "conversion.log".to_string()
}

fn default_output_tail_lines() -> usize {
    50
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            working_dir: default_working_dir(),
            jvm_args: default_jvm_args(),
            log_file_name: default_log_file_name(),
            output_tail_lines: default_output_tail_lines(),
        }
    }
}

impl ConverterConfig {
    /// Creates a new config with a custom program and working directory.
    pub fn with_program(program: PathBuf, working_dir: PathBuf) -> Self {
        Self {
            program,
            working_dir,
            ..Default::default()
        }
    }

    /// Sets the JVM options.
    pub fn with_jvm_args(mut self, jvm_args: impl Into<String>) -> Self {
        self.jvm_args = jvm_args.into();
        self
    }
}
