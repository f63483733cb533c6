//! TTL cache keyed by a release query's canonical string.

use crate::models::ReleaseInfo;
use chrono::{DateTime, Utc};
use mini_moka::sync::Cache;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// A cached lookup result. Never mutated after insertion.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub value: ReleaseInfo,
    /// Monotonic insertion time, used for expiry.
    pub stored_at: Instant,
    /// Wall-clock insertion time, used for reporting.
    pub fetched_at: DateTime<Utc>,
    pub ttl: Duration,
}

impl CacheEntry {
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.stored_at)
    }

    pub fn is_fresh(&self, now: Instant) -> bool {
        self.age(now) < self.ttl
    }
}

/// Snapshot of one cache key, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheStatus {
    pub key: String,
    pub cached: bool,
    pub placeholder: bool,
    pub fetched_at: Option<String>,
    pub age_secs: Option<u64>,
    pub expires_in_secs: Option<u64>,
}

/// Release info cache with lazily checked per-entry TTLs.
///
/// There is no size bound: a new result is always kept until its TTL runs
/// out. The backing store drops anything older than the longest TTL in use,
/// and per-entry freshness is checked on read.
pub struct ReleaseCache {
    entries: Cache<String, Arc<CacheEntry>>,
}

impl ReleaseCache {
    /// Create a cache whose entries are never kept longer than `max_ttl`.
    pub fn new(max_ttl: Duration) -> Self {
        Self {
            entries: Cache::builder().time_to_live(max_ttl).build(),
        }
    }

    /// Return the cached value if present and still fresh.
    ///
    /// An expired entry is reported as a miss but left in place; a concurrent
    /// writer may already have replaced it, so removal is left to
    /// `sweep_expired`.
    pub fn get(&self, key: &str) -> Option<ReleaseInfo> {
        let entry = self.entries.get(&key.to_string())?;
        if entry.is_fresh(Instant::now()) {
            return Some(entry.value.clone());
        }
        debug!("Release cache entry expired for {}", key);
        None
    }

    /// Store `value` under `key` for `ttl`, replacing any previous entry.
    pub fn insert(&self, key: &str, value: ReleaseInfo, ttl: Duration) {
        let entry = CacheEntry {
            value,
            stored_at: Instant::now(),
            fetched_at: Utc::now(),
            ttl,
        };
        self.entries.insert(key.to_string(), Arc::new(entry));
    }

    pub fn invalidate(&self, key: &str) {
        self.entries.invalidate(&key.to_string());
    }

    /// Remove every expired entry, returning how many were dropped.
    pub fn sweep_expired(&self) -> usize {
        let now = Instant::now();
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|entry| !entry.value().is_fresh(now))
            .map(|entry| entry.key().clone())
            .collect();

        for key in &expired {
            self.entries.invalidate(key);
        }
        if !expired.is_empty() {
            debug!("Swept {} expired release cache entries", expired.len());
        }
        expired.len()
    }

    /// Describe the entry for `key` without touching it.
    pub fn status(&self, key: &str) -> CacheStatus {
        let now = Instant::now();
        let entry = self
            .entries
            .get(&key.to_string())
            .filter(|entry| entry.is_fresh(now));

        match entry {
            Some(entry) => {
                let age = entry.age(now);
                CacheStatus {
                    key: key.to_string(),
                    cached: true,
                    placeholder: entry.value.is_placeholder(),
                    fetched_at: Some(entry.fetched_at.to_rfc3339()),
                    age_secs: Some(age.as_secs()),
                    expires_in_secs: Some(entry.ttl.saturating_sub(age).as_secs()),
                }
            }
            None => CacheStatus {
                key: key.to_string(),
                cached: false,
                placeholder: false,
                fetched_at: None,
                age_secs: None,
                expires_in_secs: None,
            },
        }
    }
}
