//! Converter module for turning uploaded scores into MusicXML movements.
//!
//! The conversion engine is an external batch process (Audiveris, launched through
//! its Gradle wrapper). This module owns the argument contract, output capture and
//! exit reporting; it does not interpret what the engine produced.
//!
//! # Example
//!
//! ```ignore
//! use partitura_core::converter::{AudiverisConverter, ConversionJob, Converter, OutputSink};
//!
//! let converter = AudiverisConverter::with_defaults();
//! let log = tokio::fs::File::create("/tmp/downloads/job-1/conversion.log").await?;
//! let sink = OutputSink::new("job-1", log, false, 50);
//!
//! let job = ConversionJob {
//!     job_id: "job-1".to_string(),
//!     input_path: PathBuf::from("/tmp/uploads/job-1.pdf"),
//!     output_dir: PathBuf::from("/tmp/downloads/job-1"),
//! };
//!
//! let exit = converter.convert(&job, sink).await?;
//! if let Some(detail) = exit.error_detail() {
//!     println!("converter reported: {}", detail);
//! }
//! ```

mod args;
mod audiveris;
mod config;
mod error;
mod sink;
mod traits;
mod types;

pub use args::{batch_args, escape_args};
pub use audiveris::AudiverisConverter;
pub use config::ConverterConfig;
pub use error::ConverterError;
pub use sink::{OutputSink, MAX_LINE_BYTES};
pub use traits::Converter;
pub use types::{ConversionExit, ConversionJob};
