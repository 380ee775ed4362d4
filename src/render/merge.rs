//! Compositing one image over another.

use image::{Rgba, RgbaImage};

use super::check_size;
use crate::error::Result;
use crate::geometry::{PointPx, SizePx};

/// Draws `overlay` over a copy of `base` with its top-left corner at `position`.
///
/// The result always has the dimensions of `base`; overlay pixels that fall
/// outside the canvas are dropped. An empty base is rejected; an empty
/// overlay leaves the copy unchanged.
pub fn merge(base: &RgbaImage, overlay: &RgbaImage, position: PointPx) -> Result<RgbaImage> {
    check_size(SizePx::of(base))?;
    let mut canvas = base.clone();
    composite_over(&mut canvas, overlay, position.x, position.y);
    Ok(canvas)
}

/// Composites a source image onto a destination image at the specified position.
///
/// Uses standard alpha blending (source over destination).
pub fn composite_over(dest: &mut RgbaImage, src: &RgbaImage, x: i32, y: i32) {
    let dest_width = dest.width() as i64;
    let dest_height = dest.height() as i64;

    for (sx, sy, src_pixel) in src.enumerate_pixels() {
        let dx = x as i64 + sx as i64;
        let dy = y as i64 + sy as i64;

        if dx < 0 || dy < 0 || dx >= dest_width || dy >= dest_height {
            continue;
        }

        let dst_pixel = dest.get_pixel_mut(dx as u32, dy as u32);
        *dst_pixel = alpha_blend(*src_pixel, *dst_pixel);
    }
}

/// Alpha blends two RGBA pixels (source over destination).
fn alpha_blend(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    match src[3] {
        255 => return src,
        0 => return dst,
        _ => {}
    }

    let sa = src[3] as f32 / 255.0;
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);

    let blend = |s: u8, d: u8| -> u8 {
        let sf = s as f32 / 255.0;
        let df = d as f32 / 255.0;
        let out = (sf * sa + df * da * (1.0 - sa)) / out_a;
        (out * 255.0).round() as u8
    };

    Rgba([
        blend(src[0], dst[0]),
        blend(src[1], dst[1]),
        blend(src[2], dst[2]),
        (out_a * 255.0).round() as u8,
    ])
}
