//! Network access for release metadata.
//!
//! This module provides:
//! - HTTP client with timeouts and rate limit awareness
//! - The `ReleaseSource` seam the provider fetches through
//! - The GitHub-backed implementation of that seam

mod client;
mod github;

pub use client::{extract_domain, HttpClient, RateLimitState};
pub use github::GitHubSource;

use crate::models::{GitHubRelease, VersionManifest};
use crate::Result;
use async_trait::async_trait;

/// Where manifests and release asset listings come from.
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    /// Fetch and parse a version manifest.
    async fn fetch_manifest(&self, url: &str) -> Result<VersionManifest>;

    /// Fetch the latest published release of `owner/repo`.
    async fn fetch_latest_release(&self, owner: &str, repo: &str) -> Result<GitHubRelease>;
}
