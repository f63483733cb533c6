//! In-memory caching of release lookups.
//!
//! Entries carry their own TTL so that failure placeholders can expire
//! sooner than successful results sharing the same cache.

mod release_cache;

pub use release_cache::{CacheEntry, CacheStatus, ReleaseCache};
