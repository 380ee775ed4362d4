//! Render requests and the cache keys derived from them.

use std::fmt;
use std::path::{self, Path};

use image::RgbaImage;
use sha2::{Digest, Sha256};

use crate::assets::AssetCatalog;
use crate::color::Color;
use crate::geometry::{PointPx, SizePx};
use crate::render::ColorStop;

// ============================================================================
// StencilRef
// ============================================================================

/// The stencil a tint is applied to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StencilRef<'a> {
    /// A stencil looked up by name in an [`AssetCatalog`](crate::AssetCatalog).
    ///
    /// `namespace: None` searches the main namespace.
    Named {
        name: &'a str,
        namespace: Option<&'a str>,
    },

    /// An image already in memory. Tints of in-memory images are never cached.
    Image(&'a RgbaImage),
}

// ============================================================================
// RenderRequest
// ============================================================================

/// Describes one rendering operation and all of its parameters.
///
/// A request is immutable; its [`cache_key`](Self::cache_key) is a pure
/// function of the variant and its parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderRequest<'a> {
    /// Fills the stencil's alpha mask with `color`.
    Tint { source: StencilRef<'a>, color: Color },

    /// Top-to-bottom linear gradient between two stops.
    Gradient {
        size: SizePx,
        start: ColorStop,
        end: ColorStop,
    },

    /// Flat-filled rectangle covering the whole canvas.
    Square { color: Color, size: SizePx },

    /// Flat-filled ellipse inscribed in the canvas.
    Circle { color: Color, size: SizePx },

    /// Scales `image` to `size`. Cached only when `identifier` is non-empty.
    Resize {
        image: &'a RgbaImage,
        size: SizePx,
        identifier: Option<&'a str>,
    },

    /// Draws `overlay` over `image` at `position`. Cached only when `identifier` is non-empty.
    Merge {
        image: &'a RgbaImage,
        overlay: &'a RgbaImage,
        position: PointPx,
        identifier: Option<&'a str>,
    },
}

impl<'a> RenderRequest<'a> {
    pub fn named(name: &'a str, color: Color) -> Self {
        Self::Tint {
            source: StencilRef::Named {
                name,
                namespace: None,
            },
            color,
        }
    }

    pub fn named_in(name: &'a str, namespace: Option<&'a str>, color: Color) -> Self {
        Self::Tint {
            source: StencilRef::Named { name, namespace },
            color,
        }
    }

    pub fn tint(image: &'a RgbaImage, color: Color) -> Self {
        Self::Tint {
            source: StencilRef::Image(image),
            color,
        }
    }

    pub fn gradient(size: SizePx, start: ColorStop, end: ColorStop) -> Self {
        Self::Gradient { size, start, end }
    }

    pub fn square(color: Color, size: SizePx) -> Self {
        Self::Square { color, size }
    }

    pub fn circle(color: Color, size: SizePx) -> Self {
        Self::Circle { color, size }
    }

    pub fn resize(image: &'a RgbaImage, size: SizePx, identifier: Option<&'a str>) -> Self {
        Self::Resize {
            image,
            size,
            identifier,
        }
    }

    pub fn merge(
        image: &'a RgbaImage,
        overlay: &'a RgbaImage,
        position: PointPx,
        identifier: Option<&'a str>,
    ) -> Self {
        Self::Merge {
            image,
            overlay,
            position,
            identifier,
        }
    }

    /// Short name of the operation, used in log lines and key descriptors.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Tint { .. } => "tint",
            Self::Gradient { .. } => "gradient",
            Self::Square { .. } => "square",
            Self::Circle { .. } => "circle",
            Self::Resize { .. } => "resize",
            Self::Merge { .. } => "merge",
        }
    }

    /// Derives the cache key for this request.
    ///
    /// Returns `None` for requests that must not be cached: tints of in-memory
    /// images, named tints with an empty name, and resize/merge requests whose
    /// identifier is absent or empty.
    pub fn cache_key(&self) -> Option<CacheKey> {
        let kind = self.kind();
        let descriptor = match *self {
            Self::Tint {
                source: StencilRef::Named { name, namespace },
                color,
            } => {
                let name = non_empty(Some(name))?;
                format!(
                    "{kind}|{}|{}|{}",
                    text_field(namespace.unwrap_or("")),
                    text_field(name),
                    color_field(color)
                )
            }
            Self::Tint {
                source: StencilRef::Image(_),
                ..
            } => return None,
            Self::Gradient { size, start, end } => format!(
                "{kind}|{size}|{}|{}",
                stop_field(start),
                stop_field(end)
            ),
            Self::Square { color, size } | Self::Circle { color, size } => {
                format!("{kind}|{}|{size}", color_field(color))
            }
            Self::Resize {
                size, identifier, ..
            } => {
                let identifier = non_empty(identifier)?;
                format!("{kind}|{}|{size}", text_field(identifier))
            }
            Self::Merge {
                position,
                identifier,
                ..
            } => {
                let identifier = non_empty(identifier)?;
                format!("{kind}|{}|{position}", text_field(identifier))
            }
        };
        Some(CacheKey::new(descriptor))
    }

    /// Derives the cache key for this request as rendered against `assets`.
    ///
    /// Named tints also cover the absolute directory of their namespace, so
    /// catalogs with different roots never share entries. A named tint in an
    /// unknown namespace has no key.
    pub fn cache_key_in(&self, assets: &AssetCatalog) -> Option<CacheKey> {
        let key = self.cache_key()?;
        match *self {
            Self::Tint {
                source: StencilRef::Named { namespace, .. },
                ..
            } => {
                let dir = assets.namespace_dir(namespace)?;
                Some(CacheKey::new(format!(
                    "{}|{}",
                    key.descriptor(),
                    text_field(&absolute_dir(dir))
                )))
            }
            _ => Some(key),
        }
    }
}

fn absolute_dir(dir: &Path) -> String {
    path::absolute(dir)
        .unwrap_or_else(|_| dir.to_path_buf())
        .to_string_lossy()
        .into_owned()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

// Length-prefixed so that separators inside names cannot collide.
fn text_field(value: &str) -> String {
    format!("{}:{}", value.len(), value)
}

fn color_field(color: Color) -> String {
    format!("{},{},{},{}", color.r, color.g, color.b, color.a)
}

fn stop_field(stop: ColorStop) -> String {
    format!("{}@{:08x}", color_field(stop.color), stop.location.to_bits())
}

// ============================================================================
// CacheKey
// ============================================================================

/// Deterministic identifier of a cached render.
///
/// The descriptor is a canonical text form of the request parameters, e.g.
/// `square|255,0,0,255|64x64`. The file name is the SHA-256 of the descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    descriptor: String,
    digest: String,
}

impl CacheKey {
    pub fn new(descriptor: impl Into<String>) -> Self {
        let descriptor = descriptor.into();
        let digest = format!("{:x}", Sha256::digest(descriptor.as_bytes()));
        Self { descriptor, digest }
    }

    pub fn descriptor(&self) -> &str {
        &self.descriptor
    }

    /// Lowercase hex SHA-256 of the descriptor.
    pub fn digest(&self) -> &str {
        &self.digest
    }

    /// Name of the file the render is stored under.
    pub fn file_name(&self) -> String {
        format!("{}.png", self.digest)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.descriptor)
    }
}

// ============================================================================
// Tests
// ============================================================================
