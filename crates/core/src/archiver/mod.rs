//! Archiver module for packing a job's movements into one downloadable bundle.
//!
//! Packing is delegated to an external command that takes a target path plus a
//! list of inputs and stores the inputs without their directory structure.

mod config;
mod error;
mod traits;
mod zip;

pub use config::ArchiverConfig;
pub use error::ArchiverError;
pub use traits::Archiver;
pub use zip::ZipArchiver;
