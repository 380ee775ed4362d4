//! stencil-renderer: tinted stencils and procedural images with a disk cache
//!
//! This crate recolors single-color "stencil" images, generates simple
//! procedural images (flat squares and circles, linear gradients), resizes
//! and composites images, and persists every keyed result in a cache
//! directory so repeated requests skip the rendering work.
//!
//! # Example
//!
//! ```
//! use stencil_renderer::{
//!     AssetSettings, CacheSettings, Color, Origin, RenderRequest, RendererConfig, SizePx,
//!     StencilRenderer,
//! };
//!
//! let root = std::env::temp_dir().join("stencil-renderer-lib-doc");
//! let config = RendererConfig::new()
//!     .with_cache(CacheSettings::in_root(&root))
//!     .with_assets(AssetSettings::in_root("assets"));
//! let renderer = StencilRenderer::from_config(&config);
//! renderer.clear_cache(false);
//!
//! let request = RenderRequest::circle(Color::rgb(0, 128, 255), SizePx::square(32));
//! let first = renderer.render_or_fetch(&request).unwrap();
//! let second = renderer.render_or_fetch(&request).unwrap();
//!
//! assert_eq!(first.origin, Origin::Rendered);
//! assert_eq!(second.origin, Origin::Cached);
//! assert_eq!(first.bytes, second.bytes);
//! ```
//!
//! # Caching rules
//!
//! Keys are derived from the request parameters (see [`RenderRequest::cache_key`]).
//! Resize and merge requests are cached only when given a non-empty
//! identifier; tints of in-memory images are never cached. Nothing in the
//! public surface returns an error: failures degrade to `None` or to an
//! uncached render, and are reported through the `log` facade.

mod assets;
mod cache;
mod color;
mod config;
mod error;
mod geometry;
mod render;
mod renderer;
mod request;

pub use assets::AssetCatalog;
pub use cache::{CachedImage, ClearReport, DiskCache, decode_png, encode_png};
pub use color::{Color, ParseColorError};
pub use config::{
    AssetSettings, CacheSettings, ConfigError, DEFAULT_CACHE_FOLDER, RendererConfig,
};
pub use error::RenderError;
pub use geometry::{ParseGeometryError, PointPx, SizePx};
pub use render::{ColorStop, render};
pub use renderer::{Origin, Rendered, StencilRenderer};
pub use request::{CacheKey, RenderRequest, StencilRef};
