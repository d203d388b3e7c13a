//! On-disk storage areas.
//!
//! - Upload area: one `<id>.<upload_extension>` file per job.
//! - Output area: one `<id>/` directory per job holding the movements, the
//!   conversion log and, once downloaded, the bundle.

mod config;
mod layout;

pub use config::StorageConfig;
pub use layout::StorageLayout;
