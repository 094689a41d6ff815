use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ManifestError;

/// Location of the manifest relative to the project root.
pub const MANIFEST_RELATIVE_PATH: &str = "config/adapters.manifest.json";

/// Persisted mapping from mode identifiers to adapter construction instructions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterManifest {
    pub adapters: BTreeMap<String, ManifestEntry>,
}

/// How to construct one adapter variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    pub path: String,
    pub class_name: String,
    #[serde(default)]
    pub requires_config: bool,
    #[serde(default)]
    pub config_key: Option<String>,
}

impl AdapterManifest {
    pub fn path_under(root: &Path) -> PathBuf {
        root.join(MANIFEST_RELATIVE_PATH)
    }

    /// Reads the manifest from disk. Never cached.
    pub async fn load(root: &Path) -> Result<Self, ManifestError> {
        let path = Self::path_under(root);
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                return Err(ManifestError::Missing { path });
            }
            Err(source) => return Err(ManifestError::Unreadable { path, source }),
        };
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> Result<Self, ManifestError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn entry(&self, mode: &str) -> Option<&ManifestEntry> {
        self.adapters.get(mode)
    }

    /// Declared modes in sorted order.
    pub fn modes(&self) -> Vec<String> {
        self.adapters.keys().cloned().collect()
    }
}
