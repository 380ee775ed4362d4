//! Pure renderers, one per [`RenderRequest`] variant.
//!
//! Nothing in this module touches the disk cache. Each renderer takes its
//! parameters and returns a fresh [`RgbaImage`]; [`render`] dispatches a
//! request to the matching one, resolving named stencils through an
//! [`AssetCatalog`] first.
//!
//! Rasterization of anti-aliased shapes and gradients goes through
//! `tiny_skia` (re-exported by resvg), which works in premultiplied alpha.
//! [`pixmap_to_rgba_image`] converts back to straight alpha.

pub mod gradient;
pub mod merge;
pub mod resize;
pub mod shape;
pub mod svg;
pub mod tint;

pub use gradient::ColorStop;

use image::{Rgba, RgbaImage};
use resvg::tiny_skia::Pixmap;

use crate::assets::AssetCatalog;
use crate::error::{RenderError, Result};
use crate::geometry::SizePx;
use crate::request::{RenderRequest, StencilRef};

/// Runs the renderer for `request`.
pub fn render(request: &RenderRequest<'_>, assets: &AssetCatalog) -> Result<RgbaImage> {
    match *request {
        RenderRequest::Tint { source, color } => match source {
            StencilRef::Named { name, namespace } => {
                let stencil = assets.load(name, namespace)?;
                tint::tint(&stencil, color)
            }
            StencilRef::Image(image) => tint::tint(image, color),
        },
        RenderRequest::Gradient { size, start, end } => gradient::linear_gradient(size, start, end),
        RenderRequest::Square { color, size } => shape::square(color, size),
        RenderRequest::Circle { color, size } => shape::circle(color, size),
        RenderRequest::Resize { image, size, .. } => resize::resize(image, size),
        RenderRequest::Merge {
            image,
            overlay,
            position,
            ..
        } => merge::merge(image, overlay, position),
    }
}

// ============================================================================
// Pixmap Helpers
// ============================================================================

/// Largest RGBA buffer any renderer allocates, in bytes.
pub(crate) const MAX_IMAGE_BYTES: u64 = i32::MAX as u64;

/// Rejects empty sizes and sizes whose RGBA buffer exceeds [`MAX_IMAGE_BYTES`].
pub(crate) fn check_size(size: SizePx) -> Result<()> {
    let bytes = size.width as u64 * size.height as u64 * 4;
    if size.is_empty() || bytes > MAX_IMAGE_BYTES {
        return Err(RenderError::InvalidSize(size));
    }
    Ok(())
}

/// Allocates a transparent pixmap, rejecting empty or oversized dimensions.
pub(crate) fn new_pixmap(size: SizePx) -> Result<Pixmap> {
    check_size(size)?;
    Pixmap::new(size.width, size.height).ok_or(RenderError::InvalidSize(size))
}

/// Converts a tiny_skia Pixmap to an image::RgbaImage.
pub(crate) fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let width = pixmap.width();
    let mut img = RgbaImage::new(width, pixmap.height());

    for (i, pixel) in pixmap.pixels().iter().enumerate() {
        let x = i as u32 % width;
        let y = i as u32 / width;
        let (r, g, b, a) = unpremultiply(pixel.red(), pixel.green(), pixel.blue(), pixel.alpha());
        img.put_pixel(x, y, Rgba([r, g, b, a]));
    }

    img
}

/// Unpremultiplies a premultiplied alpha pixel.
fn unpremultiply(r: u8, g: u8, b: u8, a: u8) -> (u8, u8, u8, u8) {
    if a == 0 {
        (0, 0, 0, 0)
    } else {
        let a_f = a as f32 / 255.0;
        (
            (r as f32 / a_f).round().min(255.0) as u8,
            (g as f32 / a_f).round().min(255.0) as u8,
            (b as f32 / a_f).round().min(255.0) as u8,
            a,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::geometry::PointPx;

    #[test]
    fn unpremultiply_restores_channels() {
        assert_eq!(unpremultiply(0, 0, 0, 0), (0, 0, 0, 0));
        assert_eq!(unpremultiply(255, 0, 0, 255), (255, 0, 0, 255));
        assert_eq!(unpremultiply(64, 0, 0, 128), (128, 0, 0, 128));
    }

    #[test]
    fn new_pixmap_rejects_empty_sizes() {
        assert!(matches!(
            new_pixmap(SizePx::new(0, 3)),
            Err(RenderError::InvalidSize(_))
        ));
        assert!(new_pixmap(SizePx::new(2, 3)).is_ok());
    }

    #[test]
    fn oversized_buffers_are_rejected() {
        assert!(check_size(SizePx::new(u32::MAX, u32::MAX)).is_err());
        assert!(check_size(SizePx::new(1, 1 << 29)).is_err());
        assert!(check_size(SizePx::new(1, (1 << 29) - 1)).is_ok());
        assert!(matches!(
            new_pixmap(SizePx::new(u32::MAX, 1)),
            Err(RenderError::InvalidSize(_))
        ));
    }

    #[test]
    fn dispatch_covers_every_variant() {
        let assets = AssetCatalog::new(std::env::temp_dir());
        let base = RgbaImage::from_pixel(6, 6, Rgba([10, 20, 30, 255]));
        let size = SizePx::new(6, 4);
        let red = Color::rgb(255, 0, 0);

        let requests = [
            RenderRequest::tint(&base, red),
            RenderRequest::gradient(
                size,
                ColorStop::new(red, 0.0),
                ColorStop::new(Color::BLACK, 1.0),
            ),
            RenderRequest::square(red, size),
            RenderRequest::circle(red, size),
            RenderRequest::resize(&base, size, None),
            RenderRequest::merge(&base, &base, PointPx::new(2, 2), None),
        ];

        for request in &requests {
            let image = render(request, &assets).unwrap();
            let expected = match request {
                RenderRequest::Tint { .. } | RenderRequest::Merge { .. } => SizePx::of(&base),
                _ => size,
            };
            assert_eq!(SizePx::of(&image), expected, "{}", request.kind());
        }
    }

    #[test]
    fn missing_named_stencil_is_source_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let assets = AssetCatalog::new(dir.path());
        let err = render(&RenderRequest::named("absent", Color::BLACK), &assets).unwrap_err();
        assert!(matches!(err, RenderError::SourceNotFound { .. }));
    }
}
