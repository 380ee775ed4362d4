//! Pixel-space sizes and positions.

use std::fmt;
use std::str::FromStr;

use image::RgbaImage;
use thiserror::Error;

/// Error returned when a size or point string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind} `{input}`")]
pub struct ParseGeometryError {
    kind: &'static str,
    input: String,
}

/// A 2D size in pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SizePx {
    pub width: u32,
    pub height: u32,
}

impl SizePx {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Creates a size with equal width and height.
    pub fn square(side: u32) -> Self {
        Self::new(side, side)
    }

    /// Returns the dimensions of an existing image.
    pub fn of(image: &RgbaImage) -> Self {
        Self::new(image.width(), image.height())
    }

    /// Returns true if width equals height.
    pub fn is_square(&self) -> bool {
        self.width == self.height
    }

    /// Returns true if either dimension is zero, i.e. there is nothing to rasterize.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Display for SizePx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl From<(u32, u32)> for SizePx {
    fn from((width, height): (u32, u32)) -> Self {
        Self::new(width, height)
    }
}

impl FromStr for SizePx {
    type Err = ParseGeometryError;

    /// Parses `WIDTHxHEIGHT`, or a single number for a square.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseGeometryError {
            kind: "size",
            input: s.to_string(),
        };
        let parse = |v: &str| v.trim().parse::<u32>().map_err(|_| invalid());

        match s.split_once(['x', 'X']) {
            Some((w, h)) => Ok(Self::new(parse(w)?, parse(h)?)),
            None => Ok(Self::square(parse(s)?)),
        }
    }
}

/// A pixel offset from the top-left corner of an image.
///
/// Coordinates may be negative; content placed there is clipped to the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PointPx {
    pub x: i32,
    pub y: i32,
}

impl PointPx {
    pub const ORIGIN: Self = Self::new(0, 0);

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for PointPx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

impl From<(i32, i32)> for PointPx {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl FromStr for PointPx {
    type Err = ParseGeometryError;

    /// Parses `X,Y`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseGeometryError {
            kind: "point",
            input: s.to_string(),
        };
        let (x, y) = s.split_once(',').ok_or_else(invalid)?;
        let x = x.trim().parse().map_err(|_| invalid())?;
        let y = y.trim().parse().map_err(|_| invalid())?;
        Ok(Self::new(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_px_is_square() {
        assert!(SizePx::new(100, 100).is_square());
        assert!(!SizePx::new(100, 200).is_square());
        assert!(SizePx::square(7).is_square());
    }

    #[test]
    fn size_px_empty() {
        assert!(SizePx::new(0, 10).is_empty());
        assert!(SizePx::new(10, 0).is_empty());
        assert!(!SizePx::new(1, 1).is_empty());
    }

    #[test]
    fn size_px_of_image() {
        let img = RgbaImage::new(64, 32);
        assert_eq!(SizePx::of(&img), SizePx::new(64, 32));
        assert_eq!(SizePx::of(&img).to_string(), "64x32");
    }

    #[test]
    fn point_px_display() {
        assert_eq!(PointPx::new(-3, 12).to_string(), "-3,12");
        assert_eq!(PointPx::from((1, 2)), PointPx::new(1, 2));
    }

    #[test]
    fn parse_sizes() {
        assert_eq!("64x32".parse::<SizePx>().unwrap(), SizePx::new(64, 32));
        assert_eq!("16".parse::<SizePx>().unwrap(), SizePx::square(16));
        assert!("64x".parse::<SizePx>().is_err());
        assert!("-1x2".parse::<SizePx>().is_err());
    }

    #[test]
    fn parse_points() {
        assert_eq!("-4, 8".parse::<PointPx>().unwrap(), PointPx::new(-4, 8));
        assert!("4".parse::<PointPx>().is_err());
        let err = "a,b".parse::<PointPx>().unwrap_err();
        assert_eq!(err.to_string(), "invalid point `a,b`");
    }
}
