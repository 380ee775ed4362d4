//! RGBA colors used as tint and fill parameters.

use std::fmt;
use std::str::FromStr;

use palette::{Srgb, Srgba};
use resvg::tiny_skia;
use thiserror::Error;

/// An 8-bit-per-channel, non-premultiplied RGBA color.
///
/// Colors parse from CSS-style hex strings:
///
/// ```
/// use stencil_renderer::Color;
///
/// let red: Color = "#ff0000".parse().unwrap();
/// assert_eq!(red, Color::rgb(255, 0, 0));
///
/// let translucent: Color = "#00ff0080".parse().unwrap();
/// assert_eq!(translucent.a, 0x80);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Creates a color from all four channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a fully opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Returns the channels as `[r, g, b, a]`, the layout of an `image::Rgba<u8>` pixel.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Returns true if the alpha channel is zero.
    pub fn is_transparent(self) -> bool {
        self.a == 0
    }

    pub(crate) fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }
}

impl From<Srgba<u8>> for Color {
    fn from(c: Srgba<u8>) -> Self {
        Self::new(c.red, c.green, c.blue, c.alpha)
    }
}

impl From<Srgb<u8>> for Color {
    fn from(c: Srgb<u8>) -> Self {
        Self::rgb(c.red, c.green, c.blue)
    }
}

impl From<[u8; 4]> for Color {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self::new(r, g, b, a)
    }
}

impl fmt::Display for Color {
    /// Formats as `#rrggbb`, or `#rrggbbaa` when the color is not opaque.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

/// Error returned when a string is not a valid hex color.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color `{0}`, expected #rgb, #rrggbb or #rrggbbaa")]
pub struct ParseColorError(String);

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        let invalid = || ParseColorError(s.to_string());

        if !digits.is_ascii() {
            return Err(invalid());
        }

        if digits.len() == 8 {
            let rgb: Srgb<u8> = digits[..6].parse().map_err(|_| invalid())?;
            let alpha = u8::from_str_radix(&digits[6..], 16).map_err(|_| invalid())?;
            return Ok(Self::new(rgb.red, rgb.green, rgb.blue, alpha));
        }

        let rgb: Srgb<u8> = digits.parse().map_err(|_| invalid())?;
        Ok(rgb.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_six_digit_hex() {
        let color: Color = "#ff8000".parse().unwrap();
        assert_eq!(color, Color::new(255, 128, 0, 255));
    }

    #[test]
    fn parse_short_and_unprefixed_hex() {
        assert_eq!("#0f0".parse::<Color>().unwrap(), Color::rgb(0, 255, 0));
        assert_eq!("0000ff".parse::<Color>().unwrap(), Color::rgb(0, 0, 255));
    }

    #[test]
    fn parse_hex_with_alpha() {
        let color: Color = "#10203040".parse().unwrap();
        assert_eq!(color.to_array(), [0x10, 0x20, 0x30, 0x40]);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("#zzzzzz".parse::<Color>().is_err());
        assert!("#12345".parse::<Color>().is_err());
        assert!("#ffé000".parse::<Color>().is_err());
        assert!("".parse::<Color>().is_err());
    }

    #[test]
    fn display_round_trips() {
        for text in ["#ff0000", "#00ff0080", "#123456"] {
            let color: Color = text.parse().unwrap();
            assert_eq!(color.to_string(), text);
        }
    }

    #[test]
    fn from_palette_keeps_alpha() {
        let color = Color::from(Srgba::new(1u8, 2, 3, 4));
        assert_eq!(color, Color::new(1, 2, 3, 4));
        assert!(!color.is_transparent());
        assert!(Color::TRANSPARENT.is_transparent());
    }
}
