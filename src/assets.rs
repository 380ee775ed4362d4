//! Named stencil lookup.
//!
//! An [`AssetCatalog`] maps stencil names to files. The main namespace is a
//! single directory; additional namespaces (one per asset bundle) are
//! registered by name. Within a directory a name resolves, in order, to the
//! exact file name, `name.png`, then `name.svg`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

use image::RgbaImage;

use crate::config::AssetSettings;
use crate::error::{RenderError, Result};
use crate::render::svg::rasterize_svg;

/// Extensions tried, in order, when the bare name is not a file.
const EXTENSIONS: [&str; 2] = ["png", "svg"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetCatalog {
    main: PathBuf,
    namespaces: BTreeMap<String, PathBuf>,
}

impl AssetCatalog {
    /// Creates a catalog whose main namespace is `main`.
    pub fn new(main: impl Into<PathBuf>) -> Self {
        Self {
            main: main.into(),
            namespaces: BTreeMap::new(),
        }
    }

    /// Builds a catalog from configuration. Without a root, the main
    /// namespace is the working directory.
    pub fn from_settings(settings: &AssetSettings) -> Self {
        Self {
            main: settings.root.clone().unwrap_or_else(|| PathBuf::from(".")),
            namespaces: settings.namespaces.clone(),
        }
    }

    /// Registers a namespace directory.
    pub fn with_namespace(mut self, name: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        self.namespaces.insert(name.into(), dir.into());
        self
    }

    /// Returns the directory of a namespace; `None` selects the main namespace.
    pub fn namespace_dir(&self, namespace: Option<&str>) -> Option<&Path> {
        match namespace {
            None => Some(&self.main),
            Some(name) => self.namespaces.get(name).map(PathBuf::as_path),
        }
    }

    /// Resolves a stencil name to an existing file.
    ///
    /// Names must be relative paths without `..` components; anything else
    /// resolves to nothing.
    pub fn locate(&self, name: &str, namespace: Option<&str>) -> Option<PathBuf> {
        if name.is_empty() || !is_plain_relative(Path::new(name)) {
            return None;
        }
        let dir = self.namespace_dir(namespace)?;

        let exact = dir.join(name);
        if exact.is_file() {
            return Some(exact);
        }
        EXTENSIONS
            .iter()
            .map(|ext| dir.join(format!("{name}.{ext}")))
            .find(|candidate| candidate.is_file())
    }

    /// Loads and decodes a named stencil.
    pub fn load(&self, name: &str, namespace: Option<&str>) -> Result<RgbaImage> {
        let path = self
            .locate(name, namespace)
            .ok_or_else(|| RenderError::SourceNotFound {
                name: match namespace {
                    Some(ns) => format!("{ns}/{name}"),
                    None => name.to_string(),
                },
            })?;

        let decode_error = |reason: String| RenderError::SourceDecode {
            path: path.clone(),
            reason,
        };
        let bytes = fs::read(&path).map_err(|e| decode_error(e.to_string()))?;

        if is_svg(&path) {
            rasterize_svg(&bytes).map_err(decode_error)
        } else {
            image::load_from_memory(&bytes)
                .map(|img| img.to_rgba8())
                .map_err(|e| decode_error(e.to_string()))
        }
    }
}

fn is_plain_relative(path: &Path) -> bool {
    path.components().all(|c| matches!(c, Component::Normal(_)))
}

fn is_svg(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"))
}
