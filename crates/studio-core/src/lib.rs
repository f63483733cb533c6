//! Studio Core - release metadata for the studio's product download buttons.
//!
//! Given a product (an `owner/repo` pair or a direct manifest URL) this crate
//! fetches the Tauri `latest.json` manifest, enriches each platform's download
//! URL with the size and name of the matching GitHub release asset, and
//! memoizes the result in a TTL cache.
//!
//! # Example
//!
//! ```rust,ignore
//! use studio_core::{ProviderConfig, ReleaseInfoProvider, ReleaseQuery};
//!
//! #[tokio::main]
//! async fn main() -> studio_core::Result<()> {
//!     let provider = ReleaseInfoProvider::new(ProviderConfig::default())?;
//!
//!     let query = ReleaseQuery::repository("djyde", "ccmate-release");
//!     let info = provider.get_release_info(&query).await;
//!     println!("Latest version: {}", info.version);
//!
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod format;
pub mod models;
pub mod network;
pub mod provider;

// Re-export commonly used types
pub use cache::{CacheStatus, ReleaseCache};
pub use config::{CacheConfig, NetworkConfig, Product, ProviderConfig};
pub use error::{FailureKind, Result, StudioError};
pub use format::{format_file_size, platform_display_name};
pub use models::{
    GitHubAsset, GitHubRelease, ManifestPlatform, PlatformDownload, ReleaseInfo, ReleaseQuery,
    VersionManifest, UNKNOWN_ASSET_NAME,
};
pub use network::{GitHubSource, HttpClient, ReleaseSource};
pub use provider::{FetchOutcome, ReleaseInfoProvider};
