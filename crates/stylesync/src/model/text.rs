use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::{round_to, rounded, ColorStyle};

/// A named text style. Its color is the resolved shared color, held by value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    name: String,
    identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    grouped_identifiers: Option<Vec<String>>,
    font_name: String,
    #[serde(deserialize_with = "rounded::two_places")]
    point_size: f64,
    #[serde(deserialize_with = "rounded::two_places")]
    kerning: f64,
    #[serde(deserialize_with = "rounded::two_places")]
    line_height: f64,
    color: ColorStyle,
    #[serde(default)]
    deprecated: bool,
}

impl TextStyle {
    pub fn new(
        name: impl Into<String>,
        identifier: impl Into<String>,
        font_name: impl Into<String>,
        point_size: f64,
        kerning: f64,
        line_height: f64,
        color: ColorStyle,
    ) -> Self {
        Self {
            name: name.into(),
            identifier: identifier.into(),
            grouped_identifiers: None,
            font_name: font_name.into(),
            point_size: round_to(point_size, 2),
            kerning: round_to(kerning, 2),
            line_height: round_to(line_height, 2),
            color,
            deprecated: false,
        }
    }

    /// Attaches the identifiers of the design-file layers this style groups.
    pub fn with_grouped_identifiers(mut self, identifiers: Vec<String>) -> Self {
        self.grouped_identifiers = Some(identifiers);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn grouped_identifiers(&self) -> Option<&[String]> {
        self.grouped_identifiers.as_deref()
    }

    pub fn font_name(&self) -> &str {
        &self.font_name
    }

    pub fn point_size(&self) -> f64 {
        self.point_size
    }

    pub fn kerning(&self) -> f64 {
        self.kerning
    }

    pub fn line_height(&self) -> f64 {
        self.line_height
    }

    /// Line height relative to point size, two decimals. Zero for a zero
    /// point size.
    pub fn line_height_multiple(&self) -> f64 {
        if self.point_size == 0.0 {
            0.0
        } else {
            round_to(self.line_height / self.point_size, 2)
        }
    }

    pub fn color(&self) -> &ColorStyle {
        &self.color
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

// Floats are normalized at construction, so bitwise comparison agrees with
// `PartialEq` for every value that can be built.
impl Eq for TextStyle {}

impl Hash for TextStyle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (
            &self.name,
            &self.identifier,
            &self.grouped_identifiers,
            &self.font_name,
            self.point_size.to_bits(),
            self.kerning.to_bits(),
            self.line_height.to_bits(),
            &self.color,
            self.deprecated,
        )
            .hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Rgba;
    use std::collections::HashSet;

    fn black() -> ColorStyle {
        ColorStyle::new("Black", "c-black", Rgba::from_rgb8(0, 0, 0, 1.0))
    }

    #[test]
    fn test_new_rounds_metrics() {
        let style = TextStyle::new("Body", "t-1", "Inter", 16.004, -0.126, 22.499, black());
        assert_eq!(style.point_size(), 16.0);
        assert_eq!(style.kerning(), -0.13);
        assert_eq!(style.line_height(), 22.5);
    }

    #[test]
    fn test_line_height_multiple() {
        let style = TextStyle::new("Body", "t-1", "Inter", 16.0, 0.0, 24.0, black());
        assert_eq!(style.line_height_multiple(), 1.5);

        let style = TextStyle::new("Zero", "t-2", "Inter", 0.0, 0.0, 24.0, black());
        assert_eq!(style.line_height_multiple(), 0.0);
    }

    #[test]
    fn test_deprecated_preserves_identity() {
        let style = TextStyle::new("Body", "t-1", "Inter", 16.0, 0.0, 24.0, black())
            .with_grouped_identifiers(vec!["layer-1".to_string()]);
        let deprecated = style.deprecated();

        assert!(deprecated.is_deprecated());
        assert_eq!(deprecated.identifier(), style.identifier());
        assert_eq!(deprecated.name(), style.name());
        assert_eq!(deprecated.grouped_identifiers(), Some(&["layer-1".to_string()][..]));
    }

    #[test]
    fn test_structural_hash() {
        let a = TextStyle::new("Body", "t-1", "Inter", 16.0, 0.0, 24.0, black());
        let b = TextStyle::new("Body", "t-1", "Inter", 16.0, 0.0, 24.0, black());
        let c = a.deprecated();

        let set: HashSet<_> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_snapshot_round_trip_is_stable() {
        let style = TextStyle::new("Body", "t-1", "Inter", 16.333_3, 0.1, 22.0, black());
        let json = serde_json::to_string(&style).unwrap();
        let back: TextStyle = serde_json::from_str(&json).unwrap();
        assert_eq!(back, style);
        assert!(!json.contains("groupedIdentifiers"));
    }
}
