//! Centralized configuration for studio-core.
//!
//! Constants for network and cache behavior, the runtime `ProviderConfig`,
//! and the catalog of products whose download buttons we serve.

use crate::error::{Result, StudioError};
use crate::models::ReleaseQuery;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Network-related configuration.
pub struct NetworkConfig;

impl NetworkConfig {
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
    pub const GITHUB_HOST: &'static str = "https://github.com";
    pub const GITHUB_API_BASE: &'static str = "https://api.github.com";
    pub const GITHUB_ACCEPT: &'static str = "application/vnd.github+json";
    pub const USER_AGENT: &'static str = concat!("studio-releases/", env!("CARGO_PKG_VERSION"));
    pub const MANIFEST_FILE_NAME: &'static str = "latest.json";
    pub const RATE_LIMIT_THROTTLE_DELAY: Duration = Duration::from_millis(500);
}

/// Release cache configuration.
pub struct CacheConfig;

impl CacheConfig {
    /// How long a successful lookup is served from memory.
    pub const SUCCESS_TTL: Duration = Duration::from_secs(30 * 60);
    /// How long a failure placeholder is served before retrying upstream.
    pub const FAILURE_TTL: Duration = Duration::from_secs(5 * 60);
}

/// Runtime configuration for `ReleaseInfoProvider`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub success_ttl: Duration,
    pub failure_ttl: Duration,
    pub request_timeout: Duration,
    /// Base URL that conventional manifest URLs are built on.
    pub github_host: String,
    pub github_api_base: String,
    #[serde(skip_serializing)]
    pub github_token: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            success_ttl: CacheConfig::SUCCESS_TTL,
            failure_ttl: CacheConfig::FAILURE_TTL,
            request_timeout: NetworkConfig::REQUEST_TIMEOUT,
            github_host: NetworkConfig::GITHUB_HOST.to_string(),
            github_api_base: NetworkConfig::GITHUB_API_BASE.to_string(),
            github_token: None,
        }
    }
}

impl ProviderConfig {
    pub fn with_success_ttl(mut self, ttl: Duration) -> Self {
        self.success_ttl = ttl;
        self
    }

    pub fn with_failure_ttl(mut self, ttl: Duration) -> Self {
        self.failure_ttl = ttl;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_github_host(mut self, host: impl Into<String>) -> Self {
        self.github_host = host.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_github_api_base(mut self, base: impl Into<String>) -> Self {
        self.github_api_base = base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_github_token(mut self, token: Option<String>) -> Self {
        self.github_token = token.filter(|t| !t.trim().is_empty());
        self
    }

    /// Reject configurations that would make the cache or client unusable.
    pub fn validate(&self) -> Result<()> {
        if self.success_ttl.is_zero() || self.failure_ttl.is_zero() {
            return Err(StudioError::Config {
                message: "cache TTLs must be greater than zero".to_string(),
            });
        }
        if self.request_timeout.is_zero() {
            return Err(StudioError::Config {
                message: "request timeout must be greater than zero".to_string(),
            });
        }
        for (name, value) in [
            ("github_host", &self.github_host),
            ("github_api_base", &self.github_api_base),
        ] {
            url::Url::parse(value).map_err(|e| StudioError::Config {
                message: format!("{} is not a valid URL ({}): {}", name, value, e),
            })?;
        }
        Ok(())
    }
}

/// Products published by the studio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Product {
    CcMate,
    PandocX,
}

impl Product {
    pub const ALL: [Product; 2] = [Product::CcMate, Product::PandocX];

    pub fn slug(&self) -> &'static str {
        match self {
            Product::CcMate => "ccmate",
            Product::PandocX => "pandocx",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Product::CcMate => "CC Mate",
            Product::PandocX => "PandocX",
        }
    }

    /// The query a product page loader issues for its download button.
    pub fn release_query(&self) -> ReleaseQuery {
        match self {
            Product::CcMate => ReleaseQuery::repository("djyde", "ccmate-release"),
            Product::PandocX => ReleaseQuery::manifest(
                "https://github.com/djyde/PandocX/releases/latest/download/latest.json",
            ),
        }
    }

    pub fn from_slug(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ccmate" => Some(Product::CcMate),
            "pandocx" => Some(Product::PandocX),
            _ => None,
        }
    }
}

impl std::fmt::Display for Product {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.slug())
    }
}
