//! Symbols used to draw graphics on layers

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error parsing a hex color
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid color '{0}': expected #rrggbb or #rrggbbaa")]
pub struct ParseColorError(pub String);

/// RGBA color, written as `#rrggbb` or `#rrggbbaa`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a hex color string
    pub fn from_hex(hex: &str) -> Result<Self, ParseColorError> {
        let err = || ParseColorError(hex.to_string());
        let digits = hex.strip_prefix('#').ok_or_else(err)?;
        if !digits.is_ascii() || !(digits.len() == 6 || digits.len() == 8) {
            return Err(err());
        }

        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| err());
        let a = if digits.len() == 8 { channel(6)? } else { 255 };
        Ok(Self::rgba(channel(0)?, channel(2)?, channel(4)?, a))
    }

    /// Color as normalized `[r, g, b, a]`
    pub fn to_array(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Color {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// Line end style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineCap {
    Butt,
    #[default]
    Round,
    Square,
}

/// Stroke for polylines and outlines
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSymbol {
    pub color: Color,
    /// Width in points
    pub width: f32,
    #[serde(default)]
    pub cap: LineCap,
}

impl LineSymbol {
    pub fn new(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            cap: LineCap::Round,
        }
    }
}

/// Fill for polygons
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FillSymbol {
    pub color: Color,
    #[serde(default)]
    pub outline: Option<LineSymbol>,
}

/// Point symbol referenced by name from a style in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WebStyleSymbol {
    pub style_name: String,
    pub name: String,
}

/// Symbol attached to a graphic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Symbol {
    Line(LineSymbol),
    Fill(FillSymbol),
    WebStyle(WebStyleSymbol),
}

impl Symbol {
    /// Get the symbol type name
    pub fn name(&self) -> &'static str {
        match self {
            Symbol::Line(_) => "line",
            Symbol::Fill(_) => "fill",
            Symbol::WebStyle(_) => "web-style",
        }
    }
}

impl From<LineSymbol> for Symbol {
    fn from(symbol: LineSymbol) -> Self {
        Symbol::Line(symbol)
    }
}

impl From<FillSymbol> for Symbol {
    fn from(symbol: FillSymbol) -> Self {
        Symbol::Fill(symbol)
    }
}
