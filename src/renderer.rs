//! The public rendering surface with cache-aside persistence.

use image::RgbaImage;
use log::{debug, warn};

use crate::assets::AssetCatalog;
use crate::cache::{ClearReport, DiskCache, encode_png};
use crate::color::Color;
use crate::config::RendererConfig;
use crate::error::RenderError;
use crate::geometry::{PointPx, SizePx};
use crate::render::{self, ColorStop};
use crate::request::{CacheKey, RenderRequest};

// ============================================================================
// Rendered
// ============================================================================

/// Where a [`Rendered`] image came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Decoded from an existing cache entry; no rendering work was done.
    Cached,
    /// Rendered now and written to the cache (best-effort).
    Rendered,
    /// Rendered now without touching the disk.
    Uncached,
}

/// The result of [`StencilRenderer::render_or_fetch`].
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub image: RgbaImage,
    pub origin: Origin,
    /// PNG encoding of `image`: the cache file's bytes on a hit, the freshly
    /// encoded bytes on a keyed miss, `None` otherwise.
    pub bytes: Option<Vec<u8>>,
}

// ============================================================================
// StencilRenderer
// ============================================================================

/// Renders stencils and procedural images, persisting keyed results to disk.
///
/// Every operation is synchronous and recovers from its own failures: a
/// missing stencil yields `None`, and cache problems only cost a re-render
/// or a skipped write. All methods take `&self`, so one renderer can be
/// shared across threads.
///
/// # Example
///
/// ```
/// use stencil_renderer::{CacheSettings, Color, RendererConfig, SizePx, StencilRenderer};
///
/// let root = std::env::temp_dir().join("stencil-renderer-doc");
/// let config = RendererConfig::new().with_cache(CacheSettings::in_root(&root));
/// let renderer = StencilRenderer::from_config(&config);
///
/// let red = Color::rgb(255, 0, 0);
/// let square = renderer.square_image(red, SizePx::square(16)).unwrap();
/// assert_eq!(square.get_pixel(8, 8).0, [255, 0, 0, 255]);
///
/// renderer.clear_cache(false);
/// ```
#[derive(Debug, Clone)]
pub struct StencilRenderer {
    assets: AssetCatalog,
    cache: Option<DiskCache>,
}

impl StencilRenderer {
    /// Creates a renderer. `cache: None` makes every operation render-only.
    pub fn new(assets: AssetCatalog, cache: Option<DiskCache>) -> Self {
        Self { assets, cache }
    }

    /// Builds a renderer from configuration.
    ///
    /// If the cache directory cannot be created, caching is skipped and the
    /// renderer still works in memory.
    pub fn from_config(config: &RendererConfig) -> Self {
        let cache = DiskCache::from_settings(&config.cache).unwrap_or_else(|err| {
            debug!("caching disabled: {err}");
            None
        });
        Self::new(AssetCatalog::from_settings(&config.assets), cache)
    }

    pub fn assets(&self) -> &AssetCatalog {
        &self.assets
    }

    pub fn cache(&self) -> Option<&DiskCache> {
        self.cache.as_ref()
    }

    /// Returns the image for `request`, from the cache when possible.
    ///
    /// - Requests without a cache key (or a renderer without a cache) are
    ///   rendered directly.
    /// - A cache entry that cannot be read or decoded is treated as a miss.
    /// - On a miss, the render is encoded and written back; encode or write
    ///   failures are logged and the image is still returned.
    ///
    /// Returns `None` only if the render itself fails (missing or corrupt
    /// stencil, empty size).
    pub fn render_or_fetch(&self, request: &RenderRequest<'_>) -> Option<Rendered> {
        let (cache, key) = match (&self.cache, request.cache_key_in(&self.assets)) {
            (Some(cache), Some(key)) => (cache, key),
            _ => {
                let image = self.render_request(request)?;
                return Some(Rendered {
                    image,
                    origin: Origin::Uncached,
                    bytes: None,
                });
            }
        };

        match cache.load(&key) {
            Ok(Some(cached)) => {
                debug!("cache hit: {key}");
                return Some(Rendered {
                    image: cached.image,
                    origin: Origin::Cached,
                    bytes: Some(cached.bytes),
                });
            }
            Ok(None) => debug!("cache miss: {key}"),
            Err(err) => warn!("{err}; re-rendering"),
        }

        let image = self.render_request(request)?;
        let bytes = self.write_back(cache, &key, &image);
        Some(Rendered {
            image,
            origin: Origin::Rendered,
            bytes,
        })
    }

    fn render_request(&self, request: &RenderRequest<'_>) -> Option<RgbaImage> {
        match render::render(request, &self.assets) {
            Ok(image) => Some(image),
            Err(err @ (RenderError::SourceNotFound { .. } | RenderError::InvalidSize(_))) => {
                debug!("{} failed: {err}", request.kind());
                None
            }
            Err(err) => {
                warn!("{} failed: {err}", request.kind());
                None
            }
        }
    }

    fn write_back(&self, cache: &DiskCache, key: &CacheKey, image: &RgbaImage) -> Option<Vec<u8>> {
        let bytes = match encode_png(image) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!("not caching {key}: {err}");
                return None;
            }
        };
        if let Err(err) = cache.store(key, &bytes) {
            warn!("not caching {key}: {err}");
        }
        Some(bytes)
    }

    // ---- Named stencils ----

    /// Loads the stencil `name` from the main namespace and tints it with `color`.
    pub fn image_named(&self, name: &str, color: Color) -> Option<RgbaImage> {
        self.image_named_in(name, None, color)
    }

    /// Loads the stencil `name` from `namespace` and tints it with `color`.
    ///
    /// `namespace: None` selects the main namespace.
    pub fn image_named_in(
        &self,
        name: &str,
        namespace: Option<&str>,
        color: Color,
    ) -> Option<RgbaImage> {
        self.fetch_image(&RenderRequest::named_in(name, namespace, color))
    }

    // ---- Procedural images ----

    /// A top-to-bottom linear gradient.
    pub fn gradient_image(
        &self,
        size: SizePx,
        start_color: Color,
        start_location: f32,
        end_color: Color,
        end_location: f32,
    ) -> Option<RgbaImage> {
        self.fetch_image(&RenderRequest::gradient(
            size,
            ColorStop::new(start_color, start_location),
            ColorStop::new(end_color, end_location),
        ))
    }

    pub fn square_image(&self, color: Color, size: SizePx) -> Option<RgbaImage> {
        self.fetch_image(&RenderRequest::square(color, size))
    }

    pub fn circular_image(&self, color: Color, size: SizePx) -> Option<RgbaImage> {
        self.fetch_image(&RenderRequest::circle(color, size))
    }

    // ---- Transformations ----

    /// Scales `image` to `size`. Cached only when `identifier` is non-empty.
    pub fn resize(
        &self,
        image: &RgbaImage,
        size: SizePx,
        identifier: Option<&str>,
    ) -> Option<RgbaImage> {
        self.fetch_image(&RenderRequest::resize(image, size, identifier))
    }

    /// Draws `overlay` over `image` at `position`. Cached only when
    /// `identifier` is non-empty.
    pub fn merge(
        &self,
        image: &RgbaImage,
        overlay: &RgbaImage,
        position: PointPx,
        identifier: Option<&str>,
    ) -> Option<RgbaImage> {
        self.fetch_image(&RenderRequest::merge(image, overlay, position, identifier))
    }

    /// Tints an in-memory stencil. Never cached.
    pub fn tint(&self, image: &RgbaImage, color: Color) -> Option<RgbaImage> {
        self.fetch_image(&RenderRequest::tint(image, color))
    }

    /// Removes every cached image. See [`DiskCache::clear`].
    pub fn clear_cache(&self, verbose: bool) -> ClearReport {
        match &self.cache {
            Some(cache) => cache.clear(verbose),
            None => ClearReport::default(),
        }
    }

    fn fetch_image(&self, request: &RenderRequest<'_>) -> Option<RgbaImage> {
        self.render_or_fetch(request).map(|rendered| rendered.image)
    }
}

// ============================================================================
// Tests
// ============================================================================
