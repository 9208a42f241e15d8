//! Cache Module
//!
//! Read-through memoization for the employee list: the `CacheProvider` port,
//! its in-memory implementation, and the region/key names the API uses.

mod entry;
mod memory;
mod provider;
mod stats;


// Re-export public types
pub use entry::CacheEntry;
pub use memory::InMemoryCache;
pub use provider::{get_or_compute, CacheProvider};
pub use stats::CacheStats;

// == Public Constants ==
/// Region holding the memoized employee list
pub const EMPLOYEES_REGION: &str = "employees";

/// Key of the full list inside [`EMPLOYEES_REGION`]
pub const ALL_EMPLOYEES_KEY: &str = "all";
