//! Testing utilities and mock implementations.
//!
//! Mocks for the two external programs, so the orchestrator and the HTTP layer can be
//! exercised without Audiveris or `zip` installed.
//!
//! # Example
//!
//! ```rust,ignore
//! use partitura_core::testing::{MockArchiver, MockConverter};
//!
//! let converter = Arc::new(MockConverter::new().with_movements(3));
//! let archiver = Arc::new(MockArchiver::new());
//!
//! // Use in JobOrchestrator::new(...)
//! ```

mod mock_archiver;
mod mock_converter;

pub use mock_archiver::{MockArchiver, RecordedArchive};
pub use mock_converter::MockConverter;
