//! Where the latest styles come from.
//!
//! Reading a design file is not this crate's business; a [`StyleSource`]
//! hands over already-decoded styles. [`JsonStyleSource`] reads them from a
//! JSON export with raw attribute values:
//!
//! ```json
//! {
//!   "colors": [
//!     { "name": "Brand Red", "identifier": "C1", "red": 255, "green": 0, "blue": 0, "alpha": 1 }
//!   ],
//!   "textStyles": [
//!     {
//!       "name": "Body", "identifier": "T1", "groupedIdentifiers": ["L1", "L2"],
//!       "fontName": "Inter-Regular", "pointSize": 16, "kerning": 0,
//!       "lineHeight": 0, "naturalLineHeight": 19.36,
//!       "color": { "red": 255, "green": 0, "blue": 0, "alpha": 1 }
//!     }
//!   ]
//! }
//! ```
//!
//! Styles that cannot be used are left out with a diagnostic: a missing name
//! or identifier, a channel out of range, no usable line height, a text color
//! that matches no shared color, or an identifier seen before.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::error::SourceError;
use crate::model::{ColorStyle, Rgba, TextStyle};
use crate::snapshot::StyleSet;

/// Supplies the latest styles of a design.
pub trait StyleSource {
    /// Human-readable origin, for logs and errors.
    fn origin(&self) -> String;

    /// Extracts the styles. Unusable styles are reported to `diagnostics`
    /// and skipped; an empty result is an error.
    fn extract(&self, diagnostics: &mut Diagnostics) -> Result<StyleSet, SourceError>;
}

/// An in-memory style set is its own source.
impl StyleSource for StyleSet {
    fn origin(&self) -> String {
        "in-memory styles".to_string()
    }

    fn extract(&self, _diagnostics: &mut Diagnostics) -> Result<StyleSet, SourceError> {
        if self.is_empty() {
            return Err(SourceError::NoStyles {
                origin: self.origin(),
            });
        }
        Ok(self.clone())
    }
}

/// Reads styles from a JSON export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonStyleSource {
    path: PathBuf,
}

impl JsonStyleSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StyleSource for JsonStyleSource {
    fn origin(&self) -> String {
        self.path.display().to_string()
    }

    fn extract(&self, diagnostics: &mut Diagnostics) -> Result<StyleSet, SourceError> {
        let content = std::fs::read_to_string(&self.path).map_err(|source| SourceError::Read {
            path: self.path.clone(),
            source,
        })?;
        let raw: RawExport = serde_json::from_str(&content).map_err(|source| SourceError::Parse {
            path: self.path.clone(),
            source,
        })?;

        let styles = extract_styles(raw, diagnostics);
        if styles.is_empty() {
            return Err(SourceError::NoStyles {
                origin: self.origin(),
            });
        }
        debug!(
            origin = %self.origin(),
            colors = styles.colors.len(),
            text_styles = styles.text_styles.len(),
            "extracted styles"
        );
        Ok(styles)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawExport {
    #[serde(default)]
    colors: Vec<RawColor>,
    #[serde(default)]
    text_styles: Vec<RawTextStyle>,
}

#[derive(Debug, Deserialize)]
struct RawRgba {
    red: f64,
    green: f64,
    blue: f64,
    #[serde(default = "opaque")]
    alpha: f64,
}

fn opaque() -> f64 {
    1.0
}

impl RawRgba {
    /// Validates channel ranges: RGB in `0..=255`, alpha in `0..=1`.
    fn to_rgba(&self) -> Result<Rgba, String> {
        let channel = |label: &str, value: f64| -> Result<u8, String> {
            if value.is_finite() && (0.0..=255.0).contains(&value) {
                Ok(value.round() as u8)
            } else {
                Err(format!("{} channel {} is outside 0-255", label, value))
            }
        };
        if !(self.alpha.is_finite() && (0.0..=1.0).contains(&self.alpha)) {
            return Err(format!("alpha {} is outside 0-1", self.alpha));
        }
        Ok(Rgba::from_rgb8(
            channel("red", self.red)?,
            channel("green", self.green)?,
            channel("blue", self.blue)?,
            self.alpha,
        ))
    }
}

#[derive(Debug, Deserialize)]
struct RawColor {
    #[serde(default)]
    name: String,
    #[serde(default)]
    identifier: String,
    #[serde(flatten)]
    color: RawRgba,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTextStyle {
    #[serde(default)]
    name: String,
    #[serde(default)]
    identifier: String,
    #[serde(default)]
    grouped_identifiers: Option<Vec<String>>,
    #[serde(default)]
    font_name: String,
    point_size: f64,
    #[serde(default)]
    kerning: f64,
    #[serde(default)]
    line_height: f64,
    #[serde(default)]
    natural_line_height: Option<f64>,
    color: RawRgba,
}

fn extract_styles(raw: RawExport, diagnostics: &mut Diagnostics) -> StyleSet {
    let mut seen = HashSet::new();
    let mut colors = Vec::new();

    for color in raw.colors {
        let label = format!("color '{}' ({})", color.name, color.identifier);
        if let Err(problem) = check_identity(&color.name, &color.identifier) {
            diagnostics.warn(DiagnosticKind::InvalidStyle, format!("{}: {}", label, problem));
            continue;
        }
        let rgba = match color.color.to_rgba() {
            Ok(rgba) => rgba,
            Err(problem) => {
                diagnostics.warn(DiagnosticKind::InvalidStyle, format!("{}: {}", label, problem));
                continue;
            }
        };
        if !seen.insert(color.identifier.clone()) {
            diagnostics.warn(
                DiagnosticKind::DuplicateIdentifier,
                format!("{}: identifier already used", label),
            );
            continue;
        }
        colors.push(ColorStyle::new(color.name, color.identifier, rgba));
    }

    let mut text_styles = Vec::new();
    for text in raw.text_styles {
        let label = format!("text style '{}' ({})", text.name, text.identifier);
        match build_text_style(text, &colors) {
            Ok(style) => {
                if seen.insert(style.identifier().to_string()) {
                    text_styles.push(style);
                } else {
                    diagnostics.warn(
                        DiagnosticKind::DuplicateIdentifier,
                        format!("{}: identifier already used", label),
                    );
                }
            }
            Err((kind, problem)) => {
                diagnostics.warn(kind, format!("{}: {}", label, problem));
            }
        }
    }

    StyleSet::new(colors, text_styles)
}

fn check_identity(name: &str, identifier: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        Err("missing name")
    } else if identifier.trim().is_empty() {
        Err("missing identifier")
    } else {
        Ok(())
    }
}

fn build_text_style(
    raw: RawTextStyle,
    colors: &[ColorStyle],
) -> Result<TextStyle, (DiagnosticKind, String)> {
    let invalid = |problem: String| (DiagnosticKind::InvalidStyle, problem);

    check_identity(&raw.name, &raw.identifier).map_err(|p| invalid(p.to_string()))?;
    if raw.font_name.trim().is_empty() {
        return Err(invalid("missing font name".to_string()));
    }
    if !(raw.point_size.is_finite() && raw.point_size > 0.0) {
        return Err(invalid(format!("point size {} is not positive", raw.point_size)));
    }

    // A zero line height means the font's natural line height applies.
    let line_height = if raw.line_height > 0.0 {
        raw.line_height
    } else {
        match raw.natural_line_height {
            Some(natural) if natural > 0.0 => natural,
            _ => return Err(invalid("missing line height".to_string())),
        }
    };

    let rgba = raw.color.to_rgba().map_err(invalid)?;
    let Some(color) = colors.iter().find(|c| c.color() == rgba) else {
        return Err((
            DiagnosticKind::UnmatchedTextColor,
            format!("color {} matches no shared color", rgba.hex_with_alpha()),
        ));
    };

    let style = TextStyle::new(
        raw.name,
        raw.identifier,
        raw.font_name,
        raw.point_size,
        raw.kerning,
        line_height,
        color.clone(),
    );
    Ok(match raw.grouped_identifiers {
        Some(grouped) => style.with_grouped_identifiers(grouped),
        None => style,
    })
}
