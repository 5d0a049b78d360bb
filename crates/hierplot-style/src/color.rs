#![forbid(unsafe_code)]

//! Color type and hex parsing.

use std::fmt;

/// Opaque 24-bit color used for fills and strokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Unpack `0xRRGGBB`; higher bits are ignored.
    #[must_use]
    pub const fn from_u32(v: u32) -> Self {
        Self {
            r: ((v >> 16) & 0xff) as u8,
            g: ((v >> 8) & 0xff) as u8,
            b: (v & 0xff) as u8,
        }
    }

    /// Inverse of [`Rgb::from_u32`].
    #[must_use]
    pub const fn as_key(self) -> u32 {
        u32::from_be_bytes([0, self.r, self.g, self.b])
    }

    /// Parse a CSS-style hex color: `#rrggbb` or `#rgb`, `#` optional.
    #[must_use]
    pub fn parse_hex(s: &str) -> Option<Self> {
        let digits = s.trim();
        let digits = digits.strip_prefix('#').unwrap_or(digits);
        if !digits.is_ascii() {
            return None;
        }
        let width = match digits.len() {
            3 => 1,
            6 => 2,
            _ => return None,
        };
        let channel = |i: usize| {
            let v = u8::from_str_radix(&digits[i * width..(i + 1) * width], 16).ok()?;
            Some(if width == 1 { v * 17 } else { v })
        };
        Some(Self::new(channel(0)?, channel(1)?, channel(2)?))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}
