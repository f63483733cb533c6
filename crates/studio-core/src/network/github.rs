//! GitHub-backed release source.
//!
//! Manifests are plain downloads; asset listings come from the REST API's
//! "latest release" endpoint.

use crate::config::{NetworkConfig, ProviderConfig};
use crate::models::{GitHubRelease, VersionManifest};
use crate::network::client::HttpClient;
use crate::network::ReleaseSource;
use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// GitHub API client.
pub struct GitHubSource {
    http: Arc<HttpClient>,
    api_base: String,
    token: Option<String>,
}

impl GitHubSource {
    /// Create a source against the public GitHub API.
    pub fn new() -> Result<Self> {
        Self::from_config(&ProviderConfig::default())
    }

    /// Create a source using the timeout, API base and token from `config`.
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        let http = HttpClient::with_timeout(config.request_timeout)?;
        Ok(Self {
            http: Arc::new(http),
            api_base: config.github_api_base.trim_end_matches('/').to_string(),
            token: config.github_token.clone(),
        })
    }

    /// The shared HTTP client, e.g. for inspecting rate limit state.
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    fn latest_release_url(&self, owner: &str, repo: &str) -> String {
        format!("{}/repos/{}/{}/releases/latest", self.api_base, owner, repo)
    }
}

#[async_trait]
impl ReleaseSource for GitHubSource {
    async fn fetch_manifest(&self, url: &str) -> Result<VersionManifest> {
        debug!("Fetching version manifest {}", url);
        self.http.get_json(url, &[]).await
    }

    async fn fetch_latest_release(&self, owner: &str, repo: &str) -> Result<GitHubRelease> {
        let url = self.latest_release_url(owner, repo);
        debug!("Fetching latest release {}", url);

        let auth = self.token.as_ref().map(|t| format!("Bearer {}", t));
        let mut headers = vec![
            ("Accept", NetworkConfig::GITHUB_ACCEPT),
            ("X-GitHub-Api-Version", "2022-11-28"),
        ];
        if let Some(auth) = auth.as_deref() {
            headers.push(("Authorization", auth));
        }

        self.http.get_json(&url, &headers).await
    }
}
