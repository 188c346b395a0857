pub mod assets;
pub mod catalog;
pub mod config;
pub mod error;
pub mod state;
pub mod stats;
pub mod storage;
pub mod tracker;

// Re-export primary types for convenience.
pub use assets::AssetRoots;
pub use catalog::{Catalog, CatalogRegion};
pub use config::Config;
pub use error::CoreError;
pub use state::{parse_count, StateMap};
pub use stats::{compute_stats, RegionStats, Stats};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use tracker::Tracker;

/// Convenience result type for the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;
