use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::{format_number, round_to, rounded};

/// An RGBA color. RGB channels are stored 8-bit, alpha with three decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    red: u8,
    green: u8,
    blue: u8,
    #[serde(deserialize_with = "rounded::three_places")]
    alpha: f64,
}

impl Rgba {
    /// Builds a color from channel ratios in `[0, 1]`. Out-of-range ratios
    /// are clamped.
    pub fn from_ratios(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red: quantize(red),
            green: quantize(green),
            blue: quantize(blue),
            alpha: round_to(alpha.clamp(0.0, 1.0), 3),
        }
    }

    /// Builds a color from 8-bit channels and an alpha ratio.
    pub fn from_rgb8(red: u8, green: u8, blue: u8, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: round_to(alpha.clamp(0.0, 1.0), 3),
        }
    }

    pub fn red(&self) -> u8 {
        self.red
    }

    pub fn green(&self) -> u8 {
        self.green
    }

    pub fn blue(&self) -> u8 {
        self.blue
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// `#RRGGBB`.
    pub fn hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }

    /// `#RRGGBBAA`.
    pub fn hex_with_alpha(&self) -> String {
        format!("{}{:02X}", self.hex(), quantize(self.alpha))
    }

    /// Channel ratios as three-decimal strings, red then green then blue.
    pub(crate) fn ratio_strings(&self) -> [String; 3] {
        [self.red, self.green, self.blue]
            .map(|channel| format_number(round_to(f64::from(channel) / 255.0, 3)))
    }
}

impl Eq for Rgba {}

impl Hash for Rgba {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.red, self.green, self.blue, self.alpha.to_bits()).hash(state);
    }
}

fn quantize(ratio: f64) -> u8 {
    (ratio.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// A named shared color.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorStyle {
    name: String,
    identifier: String,
    color: Rgba,
    #[serde(default)]
    deprecated: bool,
}

impl ColorStyle {
    pub fn new(name: impl Into<String>, identifier: impl Into<String>, color: Rgba) -> Self {
        Self {
            name: name.into(),
            identifier: identifier.into(),
            color,
            deprecated: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    pub fn is_deprecated(&self) -> bool {
        self.deprecated
    }

    /// A copy flagged as deprecated. Name and identifier are preserved.
    pub fn deprecated(&self) -> Self {
        Self {
            deprecated: true,
            ..self.clone()
        }
    }
}
