//! Stencil tinting.

use image::RgbaImage;

use super::check_size;
use crate::color::Color;
use crate::error::Result;
use crate::geometry::SizePx;

/// Fills the stencil's alpha mask with `color`.
///
/// The source RGB channels are discarded. Each output pixel is
/// `(color.r, color.g, color.b, mask * color.a / 255)` where the mask is the
/// source alpha; fully transparent source pixels stay `(0, 0, 0, 0)`.
/// An empty stencil is rejected.
pub fn tint(stencil: &RgbaImage, color: Color) -> Result<RgbaImage> {
    check_size(SizePx::of(stencil))?;
    let mut result = stencil.clone();

    for pixel in result.pixels_mut() {
        let mask = pixel[3];
        pixel.0 = if mask == 0 {
            [0, 0, 0, 0]
        } else {
            [color.r, color.g, color.b, scale_alpha(mask, color.a)]
        };
    }

    Ok(result)
}

// Rounded mask * alpha / 255.
fn scale_alpha(mask: u8, alpha: u8) -> u8 {
    ((mask as u16 * alpha as u16 + 127) / 255) as u8
}
