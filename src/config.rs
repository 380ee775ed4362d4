//! Serializable renderer configuration.
//!
//! A [`RendererConfig`] injects everything that would otherwise be global
//! state: where the cache folder lives, whether caching is on, and where
//! named stencils are looked up.
//!
//! # Example
//!
//! ```
//! use stencil_renderer::{AssetSettings, CacheSettings, RendererConfig};
//!
//! let config = RendererConfig::new()
//!     .with_cache(CacheSettings::in_root("/tmp/stencils"))
//!     .with_assets(AssetSettings::in_root("assets").with_namespace("icons", "vendor/icons"));
//!
//! let json = config.to_json().unwrap();
//! let restored = RendererConfig::from_json(&json).unwrap();
//! assert_eq!(restored.cache.cache_dir(), config.cache.cache_dir());
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the folder created under the cache root.
pub const DEFAULT_CACHE_FOLDER: &str = "org.stencil-renderer.image-cache.default";

/// Error loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Cache Settings
// ============================================================================

/// Where and whether rendered images are persisted.
///
/// ```json
/// { "root": "/var/cache", "folder": "org.stencil-renderer.image-cache.default", "enabled": true }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct CacheSettings {
    /// Parent directory of the cache folder. `None` means the platform cache directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,

    /// Folder name created under `root`.
    #[serde(default = "default_folder")]
    pub folder: String,

    /// When false, every operation renders without touching the disk.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            root: None,
            folder: default_folder(),
            enabled: true,
        }
    }
}

impl CacheSettings {
    /// Settings rooted at an explicit directory, with the default folder name.
    pub fn in_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
            ..Self::default()
        }
    }

    /// Settings with caching turned off.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Returns the full path of the cache folder.
    ///
    /// Falls back to the system temp directory on platforms without a cache directory.
    pub fn cache_dir(&self) -> PathBuf {
        self.root
            .clone()
            .or_else(dirs::cache_dir)
            .unwrap_or_else(std::env::temp_dir)
            .join(&self.folder)
    }
}

// ============================================================================
// Asset Settings
// ============================================================================

/// Directories searched for named stencils.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct AssetSettings {
    /// Directory of the main namespace. `None` means the working directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,

    /// Additional named namespaces, each mapped to its own directory.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub namespaces: BTreeMap<String, PathBuf>,
}

impl AssetSettings {
    pub fn in_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
            namespaces: BTreeMap::new(),
        }
    }

    /// Registers a namespace directory.
    pub fn with_namespace(mut self, name: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        self.namespaces.insert(name.into(), dir.into());
        self
    }
}

fn default_folder() -> String {
    DEFAULT_CACHE_FOLDER.to_string()
}

fn default_true() -> bool {
    true
}

// ============================================================================
// RendererConfig
// ============================================================================

/// Complete configuration for a [`StencilRenderer`](crate::StencilRenderer).
///
/// # JSON Format
///
/// ```json
/// {
///   "cache": { "root": "/tmp", "folder": "stencils", "enabled": true },
///   "assets": { "root": "assets", "namespaces": { "icons": "vendor/icons" } }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct RendererConfig {
    #[serde(default)]
    pub cache: CacheSettings,

    #[serde(default)]
    pub assets: AssetSettings,
}

impl RendererConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cache(mut self, cache: CacheSettings) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_assets(mut self, assets: AssetSettings) -> Self {
        self.assets = assets;
        self
    }

    /// Serializes the config to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the config to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Reads and parses a JSON config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_json(&json)?)
    }
}

// ============================================================================
// Tests
// ============================================================================
