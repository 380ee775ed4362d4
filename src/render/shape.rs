//! Flat-filled squares and circles.

use image::{Rgba, RgbaImage};
use resvg::tiny_skia::{FillRule, Paint, PathBuilder, Rect, Transform};

use super::{check_size, new_pixmap, pixmap_to_rgba_image};
use crate::color::Color;
use crate::error::{RenderError, Result};
use crate::geometry::SizePx;

/// Returns an image whose every pixel is `color`.
pub fn square(color: Color, size: SizePx) -> Result<RgbaImage> {
    check_size(size)?;
    Ok(RgbaImage::from_pixel(size.width, size.height, Rgba(color.to_array())))
}

/// Fills the ellipse inscribed in the image bounds with `color`.
///
/// The edge is anti-aliased; pixels outside the ellipse are transparent.
pub fn circle(color: Color, size: SizePx) -> Result<RgbaImage> {
    let mut pixmap = new_pixmap(size)?;

    let bounds = Rect::from_xywh(0.0, 0.0, size.width as f32, size.height as f32)
        .ok_or(RenderError::InvalidSize(size))?;
    let path = PathBuilder::from_oval(bounds).ok_or(RenderError::InvalidSize(size))?;

    let mut paint = Paint::default();
    paint.set_color(color.to_skia());
    paint.anti_alias = true;
    pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);

    Ok(pixmap_to_rgba_image(&pixmap))
}
