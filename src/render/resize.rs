//! Image scaling.

use image::RgbaImage;
use image::imageops::{self, FilterType};

use super::check_size;
use crate::error::Result;
use crate::geometry::SizePx;

/// Interpolation used for every resize.
pub const RESIZE_FILTER: FilterType = FilterType::Triangle;

/// Scales `image` to exactly `size`, ignoring the aspect ratio.
pub fn resize(image: &RgbaImage, size: SizePx) -> Result<RgbaImage> {
    check_size(size)?;
    let source = SizePx::of(image);
    check_size(source)?;
    if source == size {
        return Ok(image.clone());
    }
    Ok(imageops::resize(image, size.width, size.height, RESIZE_FILTER))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn resize_to_requested_size() {
        let img = RgbaImage::from_pixel(40, 20, Rgba([9, 8, 7, 255]));
        let out = resize(&img, SizePx::new(10, 30)).unwrap();

        assert_eq!(out.dimensions(), (10, 30));
        assert!(out.pixels().all(|p| p.0 == [9, 8, 7, 255]));
    }

    #[test]
    fn downscale_averages_neighbours() {
        let img = RgbaImage::from_fn(4, 1, |x, _| {
            if x < 2 {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([255, 255, 255, 255])
            }
        });
        let out = resize(&img, SizePx::new(2, 1)).unwrap();
        assert!(out.get_pixel(0, 0)[0] < out.get_pixel(1, 0)[0]);
    }

    #[test]
    fn same_size_is_a_copy() {
        let img = RgbaImage::from_fn(3, 3, |x, y| Rgba([x as u8, y as u8, 0, 255]));
        assert_eq!(resize(&img, SizePx::square(3)).unwrap(), img);
    }

    #[test]
    fn empty_sizes_are_rejected() {
        let img = RgbaImage::new(4, 4);
        assert!(resize(&img, SizePx::new(0, 4)).is_err());
        assert!(resize(&RgbaImage::new(0, 0), SizePx::square(4)).is_err());
    }

    #[test]
    fn oversized_targets_are_rejected() {
        let img = RgbaImage::new(2, 2);
        assert!(resize(&img, SizePx::new(u32::MAX, u32::MAX)).is_err());
        assert!(resize(&img, SizePx::new(1 << 16, 1 << 16)).is_err());
    }
}
