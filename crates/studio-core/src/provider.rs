//! Release info lookup with memoization and failure fallback.
//!
//! `ReleaseInfoProvider::get_release_info` is what a page loader awaits. It
//! never fails: upstream problems are logged and replaced by
//! `ReleaseInfo::placeholder()`, which is cached for a shorter TTL than a
//! real result so an outage neither hammers GitHub nor lingers.

use crate::cache::{CacheStatus, ReleaseCache};
use crate::config::{Product, ProviderConfig};
use crate::models::{ReleaseInfo, ReleaseQuery};
use crate::network::{GitHubSource, ReleaseSource};
use crate::{Result, StudioError};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

/// Outcome of an uncached fetch.
#[derive(Debug)]
pub enum FetchOutcome {
    Success(ReleaseInfo),
    Failure(StudioError),
}

impl FetchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success(_))
    }

    /// Collapse to the value page loaders see.
    pub fn into_release_info(self) -> ReleaseInfo {
        match self {
            FetchOutcome::Success(info) => info,
            FetchOutcome::Failure(_) => ReleaseInfo::placeholder(),
        }
    }
}

impl From<Result<ReleaseInfo>> for FetchOutcome {
    fn from(result: Result<ReleaseInfo>) -> Self {
        match result {
            Ok(info) => FetchOutcome::Success(info),
            Err(err) => FetchOutcome::Failure(err),
        }
    }
}

/// Fetches, merges and caches release metadata.
///
/// Construct once at startup and share it (e.g. behind an `Arc`).
pub struct ReleaseInfoProvider {
    source: Arc<dyn ReleaseSource>,
    cache: ReleaseCache,
    config: ProviderConfig,
    /// Serializes cache misses so racing callers share one fetch.
    fetch_lock: Mutex<()>,
}

impl ReleaseInfoProvider {
    /// Create a provider backed by GitHub.
    pub fn new(config: ProviderConfig) -> Result<Self> {
        config.validate()?;
        let source = GitHubSource::from_config(&config)?;
        Ok(Self::with_source(Arc::new(source), config))
    }

    /// Create a provider over an arbitrary release source.
    pub fn with_source(source: Arc<dyn ReleaseSource>, config: ProviderConfig) -> Self {
        let max_ttl = config.success_ttl.max(config.failure_ttl);
        Self {
            source,
            cache: ReleaseCache::new(max_ttl),
            config,
            fetch_lock: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Release info for `query`, served from cache while fresh.
    pub async fn get_release_info(&self, query: &ReleaseQuery) -> ReleaseInfo {
        let key = query.cache_key();

        if let Some(info) = self.cache.get(&key) {
            debug!("Release info cache hit for {}", key);
            return info;
        }

        let _guard = self.fetch_lock.lock().await;

        // Another caller may have filled the entry while we waited.
        if let Some(info) = self.cache.get(&key) {
            debug!("Release info cache filled while waiting for {}", key);
            return info;
        }

        self.cache.sweep_expired();

        match self.fetch_release_info(query).await {
            FetchOutcome::Success(info) => {
                info!(
                    "Fetched release {} for {} ({} platforms)",
                    info.version,
                    key,
                    info.platforms.len()
                );
                self.cache.insert(&key, info.clone(), self.config.success_ttl);
                info
            }
            FetchOutcome::Failure(err) => {
                error!(query = %key, kind = %err.kind(), "Failed to fetch release data: {}", err);
                let placeholder = ReleaseInfo::placeholder();
                self.cache
                    .insert(&key, placeholder.clone(), self.config.failure_ttl);
                placeholder
            }
        }
    }

    /// Release info for one of the studio's products.
    pub async fn get_product_release(&self, product: Product) -> ReleaseInfo {
        self.get_release_info(&product.release_query()).await
    }

    /// Fetch and merge without consulting or filling the cache.
    pub async fn fetch_release_info(&self, query: &ReleaseQuery) -> FetchOutcome {
        self.try_fetch(query).await.into()
    }

    pub fn cache_status(&self, query: &ReleaseQuery) -> CacheStatus {
        self.cache.status(&query.cache_key())
    }

    pub fn invalidate(&self, query: &ReleaseQuery) {
        self.cache.invalidate(&query.cache_key());
    }

    /// Drop expired cache entries, returning how many were removed.
    pub fn sweep_expired(&self) -> usize {
        self.cache.sweep_expired()
    }

    async fn try_fetch(&self, query: &ReleaseQuery) -> Result<ReleaseInfo> {
        query.validate()?;

        let github_host = &self.config.github_host;
        let manifest_url = query.manifest_url(github_host);
        let manifest = self.source.fetch_manifest(&manifest_url).await?;

        let assets = match query.repository_for(github_host) {
            Some((owner, repo)) => {
                self.source
                    .fetch_latest_release(&owner, &repo)
                    .await?
                    .assets
            }
            None => {
                debug!(
                    "No repository derivable from {}, skipping asset sizes",
                    manifest_url
                );
                Vec::new()
            }
        };

        Ok(ReleaseInfo::from_manifest(manifest, &assets))
    }
}
