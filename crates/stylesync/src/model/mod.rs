//! The style model: shared colors and text styles as extracted from a design
//! file, and the record trait the differ works against.
//!
//! All numeric attributes are normalized when a value is built (and when it is
//! deserialized), so a value written to a snapshot and read back compares
//! equal to the original:
//!
//! | Attribute | Normalization |
//! |-----------|---------------|
//! | red, green, blue | quantized to 8 bits |
//! | alpha | three decimals |
//! | point size, kerning, line height | two decimals |

mod color;
mod style;
mod text;

pub use color::{ColorStyle, Rgba};
pub use style::{Style, StyleKind, StyleRecord};
pub use text::TextStyle;

/// Rounds `value` to `places` decimals. Negative zero becomes zero.
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    let rounded = (value * factor).round() / factor;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Serde helpers that normalize floats while deserializing.
pub(crate) mod rounded {
    use serde::{Deserialize, Deserializer};

    pub fn two_places<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        f64::deserialize(deserializer).map(|v| super::round_to(v, 2))
    }

    pub fn three_places<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        f64::deserialize(deserializer).map(|v| super::round_to(v, 3))
    }
}

/// Formats a normalized number without trailing zeros (`12`, `1.5`, `0.333`).
pub(crate) fn format_number(value: f64) -> String {
    format!("{}", value)
}
