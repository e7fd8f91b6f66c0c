//! Pixel color representation.
//!
//! Colors are stored as RGBA `f32` in `[0, 1]` and serialized as `#rrggbb`
//! or `#rrggbbaa` hex strings.

use std::fmt;
use std::str::FromStr;

use palette::Srgb;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An RGBA color with `f32` channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba(pub [f32; 4]);

impl Rgba {
    /// Opaque black. Default canvas background.
    pub const BLACK: Self = Self([0.0, 0.0, 0.0, 1.0]);
    /// Opaque white. Default paint color.
    pub const WHITE: Self = Self([1.0, 1.0, 1.0, 1.0]);

    /// Build an opaque color from RGB channels.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self([r, g, b, 1.0])
    }

    /// Single-channel intensity fed to the model.
    ///
    /// The model consumes a one-channel (R8) image, so only the red channel
    /// survives the conversion.
    pub fn intensity(&self) -> f32 {
        self.0[0].clamp(0.0, 1.0)
    }

    /// Quantize to 8-bit RGBA.
    pub fn to_rgba8(&self) -> [u8; 4] {
        let [r, g, b, a] = self.0;
        [quantize(r), quantize(g), quantize(b), quantize(a)]
    }

    /// Build from 8-bit RGBA.
    pub fn from_rgba8(px: [u8; 4]) -> Self {
        let rgb: Srgb<f32> = Srgb::new(px[0], px[1], px[2]).into_format();
        Self([rgb.red, rgb.green, rgb.blue, px[3] as f32 / 255.0])
    }
}

fn quantize(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Errors from parsing a hex color string.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("invalid hex color {0:?}: expected #rrggbb or #rrggbbaa")]
    Format(String),
}

impl FromStr for Rgba {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        let bad = || ColorParseError::Format(s.to_string());
        if !hex.is_ascii() {
            return Err(bad());
        }

        let (rgb_hex, alpha) = match hex.len() {
            6 => (hex, 255),
            8 => {
                let alpha = u8::from_str_radix(&hex[6..], 16).map_err(|_| bad())?;
                (&hex[..6], alpha)
            }
            _ => return Err(bad()),
        };

        let rgb: Srgb<u8> = rgb_hex.parse().map_err(|_| bad())?;
        Ok(Self::from_rgba8([rgb.red, rgb.green, rgb.blue, alpha]))
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.to_rgba8();
        if a == 255 {
            write!(f, "#{r:02x}{g:02x}{b:02x}")
        } else {
            write!(f, "#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
