//! Data models for release metadata.

mod github;
mod manifest;
mod release;

pub use github::{GitHubAsset, GitHubRelease};
pub use manifest::{ManifestPlatform, VersionManifest};
pub use release::{PlatformDownload, ReleaseInfo, ReleaseQuery, UNKNOWN_ASSET_NAME};
