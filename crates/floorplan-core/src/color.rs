//! Color type shared by plans, element properties and rendered primitives.

use peniko::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a color string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color '{0}': expected #rgb, #rrggbb or #rrggbbaa")]
pub struct ColorParseError(pub String);

/// Serializable color representation (RGBA8).
///
/// On the wire a color is a CSS-style hex string (`#3b82f6`). The alpha
/// channel is only written when it is not fully opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const fn black() -> Self {
        Self::rgb(0, 0, 0)
    }

    pub const fn white() -> Self {
        Self::rgb(255, 255, 255)
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn parse_hex(input: &str) -> Result<Self, ColorParseError> {
        let err = || ColorParseError(input.to_string());
        let hex = input.trim().strip_prefix('#').ok_or_else(err)?;
        if !hex.is_ascii() {
            return Err(err());
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| err());

        match hex.len() {
            3 => {
                // #rgb -> #rrggbb
                let r = channel(&hex[0..1])? * 17;
                let g = channel(&hex[1..2])? * 17;
                let b = channel(&hex[2..3])? * 17;
                Ok(Self::rgb(r, g, b))
            }
            6 => Ok(Self::rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            8 => Ok(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                channel(&hex[6..8])?,
            )),
            _ => Err(err()),
        }
    }

    /// Format as a lowercase hex string.
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Return the same color with its alpha channel scaled by `opacity`.
    pub fn with_opacity(self, opacity: f64) -> Self {
        let alpha = (f64::from(self.a) * opacity.clamp(0.0, 1.0)).round() as u8;
        Self { a: alpha, ..self }
    }

    /// Blend towards white by `amount` (0.0 = unchanged, 1.0 = white).
    pub fn lighten(self, amount: f64) -> Self {
        let amount = amount.clamp(0.0, 1.0);
        let mix = |c: u8| (f64::from(c) + (255.0 - f64::from(c)) * amount).round() as u8;
        Self::new(mix(self.r), mix(self.g), mix(self.b), self.a)
    }

    /// Blend towards black by `amount` (0.0 = unchanged, 1.0 = black).
    pub fn darken(self, amount: f64) -> Self {
        let amount = amount.clamp(0.0, 1.0);
        let mix = |c: u8| (f64::from(c) * (1.0 - amount)).round() as u8;
        Self::new(mix(self.r), mix(self.g), mix(self.b), self.a)
    }
}

impl fmt::Display for SerializableColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for SerializableColor {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hex(s)
    }
}

impl TryFrom<String> for SerializableColor {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_hex(&value)
    }
}

impl From<SerializableColor> for String {
    fn from(color: SerializableColor) -> Self {
        color.to_hex()
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_long_and_short_hex() {
        assert_eq!(
            SerializableColor::parse_hex("#3b82f6").unwrap(),
            SerializableColor::rgb(0x3b, 0x82, 0xf6)
        );
        assert_eq!(
            SerializableColor::parse_hex("#fff").unwrap(),
            SerializableColor::white()
        );
        assert_eq!(
            SerializableColor::parse_hex("#00000080").unwrap(),
            SerializableColor::new(0, 0, 0, 0x80)
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(SerializableColor::parse_hex("3b82f6").is_err());
        assert!(SerializableColor::parse_hex("#12345").is_err());
        assert!(SerializableColor::parse_hex("#zzzzzz").is_err());
    }

    #[test]
    fn test_hex_output_omits_opaque_alpha() {
        assert_eq!(SerializableColor::rgb(16, 185, 129).to_hex(), "#10b981");
        assert_eq!(SerializableColor::new(16, 185, 129, 128).to_hex(), "#10b98180");
    }

    #[test]
    fn test_serde_uses_hex_strings() {
        let color = SerializableColor::rgb(0xf8, 0xfa, 0xfc);
        let json = serde_json::to_string(&color).unwrap();
        assert_eq!(json, "\"#f8fafc\"");
        let back: SerializableColor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, color);
        assert!(serde_json::from_str::<SerializableColor>("\"blue\"").is_err());
    }

    #[test]
    fn test_peniko_conversion() {
        let color = SerializableColor::rgb(59, 130, 246);
        let peniko_color: Color = color.into();
        assert_eq!(SerializableColor::from(peniko_color), color);
    }

    #[test]
    fn test_opacity_and_lighten() {
        let color = SerializableColor::rgb(100, 100, 100);
        assert_eq!(color.with_opacity(0.5).a, 128);
        assert_eq!(color.lighten(1.0), SerializableColor::white());
        assert_eq!(color.darken(1.0), SerializableColor::black());
    }
}
