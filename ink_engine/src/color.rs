//! Ink colours.
//!
//! Stored as straight RGBA bytes; the raster works in packed ARGB
//! (`0xAARRGGBB`) and SVG output wants CSS.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::InkError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE:       Rgba = Rgba::rgb(0xFF, 0xFF, 0xFF);
    pub const BLACK:       Rgba = Rgba::rgb(0x00, 0x00, 0x00);
    pub const TRANSPARENT: Rgba = Rgba { r: 0, g: 0, b: 0, a: 0 };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Rgba { r, g, b, a: 0xFF }
    }

    /// Pack as `0xAARRGGBB`.
    pub fn to_argb(self) -> u32 {
        (self.a as u32) << 24 | (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }

    pub fn from_argb(argb: u32) -> Self {
        Rgba {
            a: (argb >> 24) as u8,
            r: (argb >> 16) as u8,
            g: (argb >>  8) as u8,
            b:  argb        as u8,
        }
    }

    /// `#rrggbb`, ignoring alpha (see [`opacity`](Self::opacity)).
    pub fn to_css(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn opacity(self) -> f32 {
        self.a as f32 / 255.0
    }
}

impl FromStr for Rgba {
    type Err = InkError;

    /// Accepts `#rgb`, `#rrggbb`, `#rrggbbaa` and a few CSS names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || InkError::InvalidColor(s.to_string());
        let t = s.trim();
        match t.to_ascii_lowercase().as_str() {
            "white"       => return Ok(Rgba::WHITE),
            "black"       => return Ok(Rgba::BLACK),
            "red"         => return Ok(Rgba::rgb(0xFF, 0x00, 0x00)),
            "green"       => return Ok(Rgba::rgb(0x00, 0x80, 0x00)),
            "blue"        => return Ok(Rgba::rgb(0x00, 0x00, 0xFF)),
            "navy"        => return Ok(Rgba::rgb(0x00, 0x00, 0x80)),
            "transparent" => return Ok(Rgba::TRANSPARENT),
            _ => {}
        }

        let hex = t.strip_prefix('#').ok_or_else(bad)?;
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(bad());
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| bad());
        let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).map(|v| v * 17).map_err(|_| bad());

        match hex.len() {
            3 => Ok(Rgba::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
            6 => Ok(Rgba::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Ok(Rgba { r: byte(0)?, g: byte(2)?, b: byte(4)?, a: byte(6)? }),
            _ => Err(bad()),
        }
    }
}

impl TryFrom<String> for Rgba {
    type Error = InkError;
    fn try_from(s: String) -> Result<Self, Self::Error> { s.parse() }
}

impl From<Rgba> for String {
    fn from(c: Rgba) -> String { c.to_string() }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 0xFF {
            write!(f, "{}", self.to_css())
        } else {
            write!(f, "{}{:02x}", self.to_css(), self.a)
        }
    }
}

impl Default for Rgba {
    fn default() -> Self { Rgba::WHITE }
}
