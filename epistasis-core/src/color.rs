//! RGBA colors with matplotlib-style parsing.
//!
//! Accepts:
//! - CSS/X11 color names, case-insensitive (`"red"`, `"DeepSkyBlue"`)
//! - Hex strings (`"#1f77b4"`, `"#1f77b480"`)
//! - Single-letter matplotlib codes (`"b"`, `"r"`, `"k"`, ...)
//!
//! Serializes as a hex string so plot configs stay human-editable.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const GRAY: Color = Color::rgb(128, 128, 128);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const TRANSPARENT: Color = Color { r: 255, g: 255, b: 255, a: 0 };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opacity in `[0, 1]`.
    pub fn opacity(&self) -> f64 {
        self.a as f64 / 255.0
    }

    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// Look up a named or single-letter color.
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.trim().to_ascii_lowercase();
        let rgb = match lower.as_str() {
            // matplotlib single-letter codes
            "b" => (0, 0, 255),
            "g" => (0, 128, 0),
            "r" => (255, 0, 0),
            "c" => (0, 191, 191),
            "m" => (191, 0, 191),
            "y" => (191, 191, 0),
            "k" => (0, 0, 0),
            "w" => (255, 255, 255),
            // CSS names used by the plots and their configs
            "black" => (0, 0, 0),
            "white" => (255, 255, 255),
            "gray" | "grey" => (128, 128, 128),
            "darkgray" | "darkgrey" => (169, 169, 169),
            "lightgray" | "lightgrey" => (211, 211, 211),
            "silver" => (192, 192, 192),
            "red" => (255, 0, 0),
            "darkred" => (139, 0, 0),
            "crimson" => (220, 20, 60),
            "orange" => (255, 165, 0),
            "darkorange" => (255, 140, 0),
            "gold" => (255, 215, 0),
            "yellow" => (255, 255, 0),
            "green" => (0, 128, 0),
            "lime" => (0, 255, 0),
            "darkgreen" => (0, 100, 0),
            "olive" => (128, 128, 0),
            "teal" => (0, 128, 128),
            "cyan" | "aqua" => (0, 255, 255),
            "deepskyblue" => (0, 191, 255),
            "skyblue" => (135, 206, 235),
            "steelblue" => (70, 130, 180),
            "blue" => (0, 0, 255),
            "navy" => (0, 0, 128),
            "purple" => (128, 0, 128),
            "magenta" | "fuchsia" => (255, 0, 255),
            "violet" => (238, 130, 238),
            "pink" => (255, 192, 203),
            "hotpink" => (255, 105, 180),
            "brown" => (165, 42, 42),
            "tan" => (210, 180, 140),
            _ => return None,
        };
        Some(Color::rgb(rgb.0, rgb.1, rgb.2))
    }

    fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if !digits.is_ascii() {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        match digits.len() {
            6 => Some(Color::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Color::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

impl FromStr for Color {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.starts_with('#') {
            return Color::from_hex(trimmed).ok_or_else(|| ModelError::UnknownColor(s.to_string()));
        }
        Color::from_name(trimmed).ok_or_else(|| ModelError::UnknownColor(s.to_string()))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Default per-order palette: order 1 red, order 2 orange, and so on.
pub fn default_order_colors() -> Vec<Color> {
    ["red", "orange", "green", "purple", "DeepSkyBlue", "yellow", "pink"]
        .iter()
        .filter_map(|name| Color::from_name(name))
        .collect()
}

/// matplotlib's default property cycle (tab10), used when a plot call does
/// not pick a color.
pub const CYCLE: [Color; 10] = [
    Color::rgb(31, 119, 180),
    Color::rgb(255, 127, 14),
    Color::rgb(44, 160, 44),
    Color::rgb(214, 39, 40),
    Color::rgb(148, 103, 189),
    Color::rgb(140, 86, 75),
    Color::rgb(227, 119, 194),
    Color::rgb(127, 127, 127),
    Color::rgb(188, 189, 34),
    Color::rgb(23, 190, 207),
];

/// The `i`-th color of [`CYCLE`], wrapping around.
pub fn cycle_color(i: usize) -> Color {
    CYCLE[i % CYCLE.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_css_names_case_insensitively() {
        assert_eq!("DeepSkyBlue".parse::<Color>().unwrap(), Color::rgb(0, 191, 255));
        assert_eq!("deepskyblue".parse::<Color>().unwrap(), Color::rgb(0, 191, 255));
        assert_eq!("grey".parse::<Color>().unwrap(), Color::GRAY);
    }

    #[test]
    fn parses_single_letter_codes() {
        assert_eq!("b".parse::<Color>().unwrap(), Color::BLUE);
        assert_eq!("k".parse::<Color>().unwrap(), Color::BLACK);
    }

    #[test]
    fn parses_hex_with_and_without_alpha() {
        assert_eq!("#1f77b4".parse::<Color>().unwrap(), Color::rgb(0x1f, 0x77, 0xb4));
        let c: Color = "#ff000080".parse().unwrap();
        assert_eq!(c.a, 0x80);
        assert!((c.opacity() - 128.0 / 255.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_unknown_names() {
        let err = "notacolor".parse::<Color>().unwrap_err();
        assert!(matches!(err, ModelError::UnknownColor(ref s) if s == "notacolor"));
        assert!("#12345".parse::<Color>().is_err());
    }

    #[test]
    fn display_roundtrips_through_parse() {
        for c in [Color::RED, Color::TRANSPARENT, Color::rgba(1, 2, 3, 4)] {
            assert_eq!(c.to_string().parse::<Color>().unwrap(), c);
        }
    }

    #[test]
    fn serde_uses_strings() {
        let json = serde_json::to_string(&Color::RED).unwrap();
        assert_eq!(json, "\"#ff0000\"");
        let back: Color = serde_json::from_str("\"orange\"").unwrap();
        assert_eq!(back, Color::rgb(255, 165, 0));
    }

    #[test]
    fn cycle_wraps() {
        assert_eq!(cycle_color(0), cycle_color(10));
        assert_ne!(cycle_color(0), cycle_color(1));
    }

    #[test]
    fn default_palette_has_seven_orders() {
        let palette = default_order_colors();
        assert_eq!(palette.len(), 7);
        assert_eq!(palette[0], Color::RED);
        assert_eq!(palette[4], Color::rgb(0, 191, 255));
    }
}
