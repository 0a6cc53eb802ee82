use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Opaque RGB fill colour, written as `#rrggbb` in config files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0x00, 0x00, 0x00);
    pub const WHITE: Self = Self::rgb(0xff, 0xff, 0xff);
    pub const YELLOW: Self = Self::rgb(0xff, 0xff, 0x00);
    pub const LIGHT_GRAY: Self = Self::rgb(0xd3, 0xd3, 0xd3);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or `#rgb` (case-insensitive).
    pub fn from_hex(hex: &str) -> Result<Self, EngineError> {
        let invalid = || EngineError::InvalidColor(hex.to_string());
        let digits = hex.strip_prefix('#').ok_or_else(invalid)?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        match digits.len() {
            6 => Ok(Self::rgb(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            3 => {
                // #abc expands to #aabbcc
                let short = |i: usize| channel(&digits[i..i + 1]).map(|v| v * 17);
                Ok(Self::rgb(short(0)?, short(1)?, short(2)?))
            }
            _ => Err(invalid()),
        }
    }

    /// RGBA in 0..=1, alpha always 1.
    pub fn to_rgba_f32(self) -> [f32; 4] {
        [
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
            1.0,
        ]
    }

    /// Relative luminance in 0..=1 (Rec. 709 weights).
    pub fn luminance(self) -> f32 {
        let [r, g, b, _] = self.to_rgba_f32();
        0.2126 * r + 0.7152 * g + 0.0722 * b
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Color {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// Font description in CSS shorthand, e.g. `20px Arial`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Font {
    pub size_px: f32,
    pub family: String,
}

impl Font {
    pub fn new(size_px: f32, family: impl Into<String>) -> Self {
        Self {
            size_px,
            family: family.into(),
        }
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::new(20.0, "Arial")
    }
}

impl fmt::Display for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}px {}", self.size_px, self.family)
    }
}

impl FromStr for Font {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidFont(s.to_string());
        let (size, family) = s.trim().split_once(' ').ok_or_else(invalid)?;
        let size_px: f32 = size
            .strip_suffix("px")
            .and_then(|n| n.parse().ok())
            .ok_or_else(invalid)?;
        let family = family.trim();
        if family.is_empty() || !size_px.is_finite() || size_px <= 0.0 {
            return Err(invalid());
        }
        Ok(Self::new(size_px, family))
    }
}

impl TryFrom<String> for Font {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Font> for String {
    fn from(font: Font) -> Self {
        font.to_string()
    }
}

/// Colours used by the renderer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub background: Color,
    pub score: Color,
    pub enemy: Color,
    pub border: Color,
    pub player: Color,
    pub pause_menu: Color,
    pub pause_text: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Color::BLACK,
            score: Color::WHITE,
            enemy: Color::YELLOW,
            border: Color::LIGHT_GRAY,
            player: Color::WHITE,
            pause_menu: Color::LIGHT_GRAY,
            pause_text: Color::BLACK,
        }
    }
}
