//! Trait definitions for the converter module.

use async_trait::async_trait;

use super::error::ConverterError;
use super::sink::OutputSink;
use super::types::{ConversionExit, ConversionJob};

/// An external engine that exports a score into movement files.
#[async_trait]
pub trait Converter: Send + Sync {
    /// Returns the name of this converter implementation.
    fn name(&self) -> &str;

    /// Runs one conversion to completion, writing all process output to `sink`.
    ///
    /// Only a failure to run the process is an `Err`. A non-zero exit is reported
    /// through the returned [`ConversionExit`] and interpreted by the caller.
    async fn convert(
        &self,
        job: &ConversionJob,
        sink: OutputSink,
    ) -> Result<ConversionExit, ConverterError>;

    /// Validates that the converter is properly configured and ready.
    async fn validate(&self) -> Result<(), ConverterError>;
}
