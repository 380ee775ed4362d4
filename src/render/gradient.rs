//! Linear gradient rasterization.

use image::RgbaImage;
use resvg::tiny_skia::{GradientStop, LinearGradient, Paint, Point, Rect, SpreadMode, Transform};

use super::{new_pixmap, pixmap_to_rgba_image};
use crate::color::Color;
use crate::error::{RenderError, Result};
use crate::geometry::SizePx;

/// A gradient color at a normalized location along the gradient axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub color: Color,
    /// Position in `0.0..=1.0`, from the top edge to the bottom edge.
    pub location: f32,
}

impl ColorStop {
    pub fn new(color: Color, location: f32) -> Self {
        Self { color, location }
    }

    /// Location clamped to `[0, 1]`; NaN is treated as `0`.
    pub fn normalized_location(&self) -> f32 {
        if self.location.is_nan() {
            0.0
        } else {
            self.location.clamp(0.0, 1.0)
        }
    }
}

/// Rasterizes a top-to-bottom linear gradient between two stops.
///
/// Stops are clamped and ordered by location. Rows before the first stop
/// take its color; rows after the last stop take the last stop's color.
pub fn linear_gradient(size: SizePx, start: ColorStop, end: ColorStop) -> Result<RgbaImage> {
    let mut pixmap = new_pixmap(size)?;

    let (first, last) = if start.normalized_location() <= end.normalized_location() {
        (start, end)
    } else {
        (end, start)
    };
    let stops = vec![
        GradientStop::new(first.normalized_location(), first.color.to_skia()),
        GradientStop::new(last.normalized_location(), last.color.to_skia()),
    ];

    let shader = LinearGradient::new(
        Point::from_xy(0.0, 0.0),
        Point::from_xy(0.0, size.height as f32),
        stops,
        SpreadMode::Pad,
        Transform::identity(),
    )
    .ok_or(RenderError::InvalidSize(size))?;

    let paint = Paint {
        shader,
        anti_alias: false,
        ..Paint::default()
    };
    let rect = Rect::from_xywh(0.0, 0.0, size.width as f32, size.height as f32)
        .ok_or(RenderError::InvalidSize(size))?;
    pixmap.fill_rect(rect, &paint, Transform::identity(), None);

    Ok(pixmap_to_rgba_image(&pixmap))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::rgb(255, 0, 0);
    const BLUE: Color = Color::rgb(0, 0, 255);

    fn close(a: u8, b: u8) -> bool {
        a.abs_diff(b) <= 2
    }

    #[test]
    fn gradient_runs_top_to_bottom() {
        let img = linear_gradient(
            SizePx::new(4, 100),
            ColorStop::new(RED, 0.0),
            ColorStop::new(BLUE, 1.0),
        )
        .unwrap();

        assert_eq!(img.dimensions(), (4, 100));
        let top = img.get_pixel(0, 0);
        let bottom = img.get_pixel(0, 99);
        assert!(top[0] > 240 && top[2] < 15, "top is red: {top:?}");
        assert!(bottom[2] > 240 && bottom[0] < 15, "bottom is blue: {bottom:?}");

        let middle = img.get_pixel(0, 50);
        assert!(middle[0] > 100 && middle[2] > 100, "middle is a mix: {middle:?}");
        assert_eq!(middle[3], 255);

        // Columns are identical.
        assert_eq!(img.get_pixel(0, 30), img.get_pixel(3, 30));
    }

    #[test]
    fn rows_outside_stops_are_padded() {
        let img = linear_gradient(
            SizePx::new(2, 100),
            ColorStop::new(RED, 0.25),
            ColorStop::new(BLUE, 0.75),
        )
        .unwrap();

        for y in [0, 10, 20] {
            let p = img.get_pixel(0, y);
            assert!(close(p[0], 255) && close(p[2], 0), "row {y}: {p:?}");
        }
        for y in [80, 90, 99] {
            let p = img.get_pixel(0, y);
            assert!(close(p[0], 0) && close(p[2], 255), "row {y}: {p:?}");
        }
    }

    #[test]
    fn reversed_stops_are_reordered() {
        let forward = linear_gradient(
            SizePx::new(1, 10),
            ColorStop::new(RED, 0.0),
            ColorStop::new(BLUE, 1.0),
        )
        .unwrap();
        let reversed = linear_gradient(
            SizePx::new(1, 10),
            ColorStop::new(BLUE, 1.0),
            ColorStop::new(RED, 0.0),
        )
        .unwrap();
        assert_eq!(forward, reversed);
    }

    #[test]
    fn locations_are_clamped() {
        assert_eq!(ColorStop::new(RED, -2.0).normalized_location(), 0.0);
        assert_eq!(ColorStop::new(RED, 3.0).normalized_location(), 1.0);
        assert_eq!(ColorStop::new(RED, f32::NAN).normalized_location(), 0.0);
    }

    #[test]
    fn empty_size_is_rejected() {
        let err = linear_gradient(
            SizePx::new(10, 0),
            ColorStop::new(RED, 0.0),
            ColorStop::new(BLUE, 1.0),
        )
        .unwrap_err();
        assert!(matches!(err, RenderError::InvalidSize(_)));
    }
}
