//! Release queries and the normalized release info handed to page loaders.

use crate::config::NetworkConfig;
use crate::error::{Result, StudioError};
use crate::models::{GitHubAsset, VersionManifest};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

/// Asset name reported when no release asset matches a platform URL.
pub const UNKNOWN_ASSET_NAME: &str = "unknown";

/// Version reported by the placeholder result.
const PLACEHOLDER_VERSION: &str = "N/A";

/// Identifies which product's release a caller wants.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReleaseQuery {
    /// Manifest lives at the conventional `releases/latest/download` path.
    Repository { owner: String, repo: String },
    /// Manifest URL supplied directly.
    Manifest { url: String },
}

impl ReleaseQuery {
    pub fn repository(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        ReleaseQuery::Repository {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    pub fn manifest(url: impl Into<String>) -> Self {
        ReleaseQuery::Manifest { url: url.into() }
    }

    /// Canonical string form, used as the cache key.
    pub fn cache_key(&self) -> String {
        match self {
            ReleaseQuery::Repository { owner, repo } => format!("{}/{}", owner, repo),
            ReleaseQuery::Manifest { url } => url.clone(),
        }
    }

    /// Resolve the manifest URL, building it on `github_host` by convention.
    pub fn manifest_url(&self, github_host: &str) -> String {
        match self {
            ReleaseQuery::Repository { owner, repo } => format!(
                "{}/{}/{}/releases/latest/download/{}",
                github_host.trim_end_matches('/'),
                owner,
                repo,
                NetworkConfig::MANIFEST_FILE_NAME
            ),
            ReleaseQuery::Manifest { url } => url.clone(),
        }
    }

    /// Owner and repo whose latest release carries the assets.
    ///
    /// A manifest URL only yields a repository when it has the shape
    /// `<github_host>/<owner>/<repo>/releases/...`.
    pub fn repository_for(&self, github_host: &str) -> Option<(String, String)> {
        match self {
            ReleaseQuery::Repository { owner, repo } => Some((owner.clone(), repo.clone())),
            ReleaseQuery::Manifest { url } => {
                let rest = url
                    .strip_prefix(github_host.trim_end_matches('/'))?
                    .strip_prefix('/')?;
                let mut parts = rest.split('/');
                let owner = parts.next()?;
                let repo = parts.next()?;
                if parts.next() != Some("releases") {
                    return None;
                }
                if is_valid_segment(owner) && is_valid_segment(repo) {
                    Some((owner.to_string(), repo.to_string()))
                } else {
                    None
                }
            }
        }
    }

    /// Check that the query can be turned into a request.
    pub fn validate(&self) -> Result<()> {
        match self {
            ReleaseQuery::Repository { owner, repo } => {
                if !is_valid_segment(owner) {
                    return Err(StudioError::validation(
                        "owner",
                        format!("invalid repository owner: {:?}", owner),
                    ));
                }
                if !is_valid_segment(repo) {
                    return Err(StudioError::validation(
                        "repo",
                        format!("invalid repository name: {:?}", repo),
                    ));
                }
                Ok(())
            }
            ReleaseQuery::Manifest { url } => {
                let parsed = url::Url::parse(url).map_err(|e| {
                    StudioError::validation("manifest_url", format!("{}: {}", url, e))
                })?;
                match parsed.scheme() {
                    "http" | "https" => Ok(()),
                    other => Err(StudioError::validation(
                        "manifest_url",
                        format!("unsupported scheme {:?}", other),
                    )),
                }
            }
        }
    }
}

impl fmt::Display for ReleaseQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.cache_key())
    }
}

impl FromStr for ReleaseQuery {
    type Err = StudioError;

    /// Parse `owner/repo` or an `http(s)://` manifest URL.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let query = if s.starts_with("http://") || s.starts_with("https://") {
            ReleaseQuery::manifest(s)
        } else {
            let (owner, repo) = s.split_once('/').ok_or_else(|| {
                StudioError::validation("query", format!("expected owner/repo, got {:?}", s))
            })?;
            ReleaseQuery::repository(owner, repo)
        };
        query.validate()?;
        Ok(query)
    }
}

fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// A manifest download URL enriched with its release asset's size and name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformDownload {
    pub platform: String,
    pub url: String,
    pub size: u64,
    pub name: String,
}

/// Release metadata for a product's download button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseInfo {
    pub version: String,
    pub notes: String,
    #[serde(rename = "pub_date")]
    pub published_at: String,
    pub platforms: BTreeMap<String, PlatformDownload>,
}

impl ReleaseInfo {
    /// Result served when upstream data could not be fetched.
    pub fn placeholder() -> Self {
        Self {
            version: PLACEHOLDER_VERSION.to_string(),
            notes: String::new(),
            published_at: String::new(),
            platforms: BTreeMap::new(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        *self == Self::placeholder()
    }

    /// Merge manifest platforms with release asset sizes.
    ///
    /// Assets are matched by exact download URL. The result has exactly the
    /// manifest's platform keys; unmatched platforms get size 0 and
    /// `UNKNOWN_ASSET_NAME`.
    pub fn from_manifest(manifest: VersionManifest, assets: &[GitHubAsset]) -> Self {
        let by_url: HashMap<&str, &GitHubAsset> = assets
            .iter()
            .map(|asset| (asset.download_url.as_str(), asset))
            .collect();

        let platforms = manifest
            .platforms
            .into_iter()
            .map(|(platform, entry)| {
                let (size, name) = match by_url.get(entry.url.as_str()) {
                    Some(asset) => (asset.size, asset.name.clone()),
                    None => (0, UNKNOWN_ASSET_NAME.to_string()),
                };
                let download = PlatformDownload {
                    platform: platform.clone(),
                    url: entry.url,
                    size,
                    name,
                };
                (platform, download)
            })
            .collect();

        Self {
            version: manifest.version,
            notes: manifest.notes,
            published_at: manifest.pub_date,
            platforms,
        }
    }
}
