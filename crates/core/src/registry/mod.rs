//! Job registry: the single source of truth for job progress.

mod memory;
mod store;

pub use memory::InMemoryJobRegistry;
pub use store::JobRegistry;
