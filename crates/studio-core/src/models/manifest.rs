//! Tauri updater manifest (`latest.json`).

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Version manifest published next to each release.
///
/// The document is third-party controlled, so only `version` and `platforms`
/// are required; `notes` and `pub_date` fall back to empty strings when
/// missing or null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionManifest {
    pub version: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub notes: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub pub_date: String,
    pub platforms: BTreeMap<String, ManifestPlatform>,
}

/// One platform entry in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestPlatform {
    pub url: String,
    #[serde(default)]
    pub signature: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}
