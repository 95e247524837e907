//! Basic color utilities shared across the planter crates.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Simple RGB color stored in 8-bit channels.
///
/// Used as the reference color for background classification and as the
/// replacement tone when painting over pot artwork.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(default)]
pub struct RgbColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl RgbColor {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Mean of the three channels, `(r + g + b) / 3`.
    pub fn brightness(self) -> f32 {
        brightness(self.red, self.green, self.blue)
    }

    /// `r + g + b`, three times the brightness without rounding.
    pub const fn channel_sum(self) -> u32 {
        self.red as u32 + self.green as u32 + self.blue as u32
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.red, self.green, self.blue)
    }
}

/// Mean channel value of an RGB triple.
pub fn brightness(r: u8, g: u8, b: u8) -> f32 {
    (r as f32 + g as f32 + b as f32) / 3.0
}

/// Parse a hexadecimal color string. Accepts `#RGB` and `#RRGGBB`, with or without `#`.
pub fn parse_hex_color(input: &str) -> Option<RgbColor> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut hex = trimmed;
    if let Some(stripped) = hex.strip_prefix('#') {
        hex = stripped;
    } else if let Some(stripped) = hex.strip_prefix("0x") {
        hex = stripped;
    }
    let hex = hex.replace('_', "");
    match hex.len() {
        3 => Some(RgbColor::new(
            replicate_nibble(hex.get(0..1)?)?,
            replicate_nibble(hex.get(1..2)?)?,
            replicate_nibble(hex.get(2..3)?)?,
        )),
        6 => Some(RgbColor::new(
            parse_byte(hex.get(0..2)?)?,
            parse_byte(hex.get(2..4)?)?,
            parse_byte(hex.get(4..6)?)?,
        )),
        _ => None,
    }
}

fn parse_byte(slice: &str) -> Option<u8> {
    u8::from_str_radix(slice, 16).ok()
}

fn replicate_nibble(slice: &str) -> Option<u8> {
    let nib = u8::from_str_radix(slice, 16).ok()?;
    Some((nib << 4) | nib)
}
