//! The template-facing view of a style.
//!
//! A [`ReplaceableStyle`] flattens a style into the string dictionary that
//! code templates read. It is computed on demand and never persisted. Two
//! projections are equal when everything except the ignored update attributes
//! matches; those attributes are derived from others (channel ratios, line
//! height multiple) and may drift by a rounding step without the style having
//! changed.

use std::collections::{BTreeMap, BTreeSet};

use stylesync_template::Replaceable;

use crate::model::{format_number, ColorStyle, StyleKind, TextStyle};
pub use crate::naming::VariableCase;

const COLOR_IGNORED: &[&str] = &["redRatio", "greenRatio", "blueRatio"];
const TEXT_IGNORED: &[&str] = &["lineHeightMultiple"];

/// A style projected into template values.
#[derive(Debug, Clone)]
pub struct ReplaceableStyle {
    kind: StyleKind,
    identifier: String,
    variable_name: String,
    replacement_dictionary: BTreeMap<String, String>,
    ignored_update_attributes: &'static [&'static str],
    deprecated: bool,
}

impl ReplaceableStyle {
    pub fn from_color(style: &ColorStyle, case: VariableCase) -> Self {
        let color = style.color();
        let variable_name = case.variable_name(style.name());
        let [red_ratio, green_ratio, blue_ratio] = color.ratio_strings();

        let mut values = BTreeMap::new();
        values.insert("name".to_string(), style.name().to_string());
        values.insert("variableName".to_string(), variable_name.clone());
        values.insert("identifier".to_string(), style.identifier().to_string());
        values.insert("hex".to_string(), color.hex());
        values.insert("hexWithAlpha".to_string(), color.hex_with_alpha());
        values.insert("red".to_string(), color.red().to_string());
        values.insert("green".to_string(), color.green().to_string());
        values.insert("blue".to_string(), color.blue().to_string());
        values.insert("alpha".to_string(), format_number(color.alpha()));
        values.insert("redRatio".to_string(), red_ratio);
        values.insert("greenRatio".to_string(), green_ratio);
        values.insert("blueRatio".to_string(), blue_ratio);
        values.insert("deprecated".to_string(), style.is_deprecated().to_string());

        Self {
            kind: StyleKind::Color,
            identifier: style.identifier().to_string(),
            variable_name,
            replacement_dictionary: values,
            ignored_update_attributes: COLOR_IGNORED,
            deprecated: style.is_deprecated(),
        }
    }

    pub fn from_text(style: &TextStyle, case: VariableCase) -> Self {
        let variable_name = case.variable_name(style.name());
        let color = style.color();

        let mut values = BTreeMap::new();
        values.insert("name".to_string(), style.name().to_string());
        values.insert("variableName".to_string(), variable_name.clone());
        values.insert("identifier".to_string(), style.identifier().to_string());
        values.insert("fontName".to_string(), style.font_name().to_string());
        values.insert("pointSize".to_string(), format_number(style.point_size()));
        values.insert("kerning".to_string(), format_number(style.kerning()));
        values.insert("lineHeight".to_string(), format_number(style.line_height()));
        values.insert(
            "lineHeightMultiple".to_string(),
            format_number(style.line_height_multiple()),
        );
        values.insert("colorName".to_string(), color.name().to_string());
        values.insert(
            "colorVariableName".to_string(),
            case.variable_name(color.name()),
        );
        values.insert("colorHex".to_string(), color.color().hex());
        values.insert("deprecated".to_string(), style.is_deprecated().to_string());

        Self {
            kind: StyleKind::Text,
            identifier: style.identifier().to_string(),
            variable_name,
            replacement_dictionary: values,
            ignored_update_attributes: TEXT_IGNORED,
            deprecated: style.is_deprecated(),
        }
    }

    pub fn kind(&self) -> StyleKind {
        self.kind
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn variable_name(&self) -> &str {
        &self.variable_name
    }

    pub fn replacement_dictionary(&self) -> &BTreeMap<String, String> {
        &self.replacement_dictionary
    }

    pub fn ignored_update_attributes(&self) -> &[&'static str] {
        self.ignored_update_attributes
    }

    pub fn is_deprecated(&self) -> bool {
        self.deprecated
    }

    /// Attributes whose values differ from `other`, ignored ones excluded,
    /// in key order.
    pub fn changed_attributes(&self, other: &ReplaceableStyle) -> Vec<String> {
        let keys: BTreeSet<&String> = self
            .replacement_dictionary
            .keys()
            .chain(other.replacement_dictionary.keys())
            .collect();

        keys.into_iter()
            .filter(|key| !self.is_ignored(key) && !other.is_ignored(key))
            .filter(|key| {
                self.replacement_dictionary.get(*key) != other.replacement_dictionary.get(*key)
            })
            .cloned()
            .collect()
    }

    fn is_ignored(&self, key: &str) -> bool {
        self.ignored_update_attributes
            .iter()
            .any(|ignored| *ignored == key)
    }
}

impl PartialEq for ReplaceableStyle {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.deprecated == other.deprecated
            && self.changed_attributes(other).is_empty()
    }
}

impl Eq for ReplaceableStyle {}

impl Replaceable for ReplaceableStyle {
    fn declaration_name(&self) -> &str {
        self.kind.declaration_name()
    }

    fn value(&self, attribute: &str) -> Option<&str> {
        self.replacement_dictionary.get(attribute).map(String::as_str)
    }

    fn is_deprecated(&self) -> bool {
        self.deprecated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Rgba;

    fn red() -> ColorStyle {
        ColorStyle::new("Brand Red", "c-red", Rgba::from_rgb8(255, 0, 0, 0.5))
    }

    #[test]
    fn test_color_dictionary() {
        let projection = ReplaceableStyle::from_color(&red(), VariableCase::LowerCamel);
        let values = projection.replacement_dictionary();

        assert_eq!(projection.declaration_name(), "color");
        assert_eq!(projection.variable_name(), "brandRed");
        assert_eq!(values["name"], "Brand Red");
        assert_eq!(values["identifier"], "c-red");
        assert_eq!(values["hex"], "#FF0000");
        assert_eq!(values["hexWithAlpha"], "#FF000080");
        assert_eq!(values["red"], "255");
        assert_eq!(values["alpha"], "0.5");
        assert_eq!(values["redRatio"], "1");
        assert_eq!(values["deprecated"], "false");
    }

    #[test]
    fn test_text_dictionary() {
        let style = TextStyle::new("Body Large", "t-1", "Inter-Regular", 16.0, 0.2, 24.0, red());
        let projection = ReplaceableStyle::from_text(&style, VariableCase::Snake);
        let values = projection.replacement_dictionary();

        assert_eq!(projection.declaration_name(), "textStyle");
        assert_eq!(projection.variable_name(), "body_large");
        assert_eq!(values["fontName"], "Inter-Regular");
        assert_eq!(values["pointSize"], "16");
        assert_eq!(values["kerning"], "0.2");
        assert_eq!(values["lineHeight"], "24");
        assert_eq!(values["lineHeightMultiple"], "1.5");
        assert_eq!(values["colorName"], "Brand Red");
        assert_eq!(values["colorVariableName"], "brand_red");
        assert_eq!(values["colorHex"], "#FF0000");
    }

    #[test]
    fn test_equality_ignores_ignored_attributes() {
        let a = ReplaceableStyle::from_color(&red(), VariableCase::LowerCamel);
        let mut b = a.clone();
        b.replacement_dictionary
            .insert("redRatio".to_string(), "0.999".to_string());
        assert_eq!(a, b);

        b.replacement_dictionary
            .insert("hex".to_string(), "#FE0000".to_string());
        assert_ne!(a, b);
    }

    #[test]
    fn test_deprecation_changes_projection() {
        let a = ReplaceableStyle::from_color(&red(), VariableCase::LowerCamel);
        let b = ReplaceableStyle::from_color(&red().deprecated(), VariableCase::LowerCamel);
        assert_ne!(a, b);
        assert_eq!(a.changed_attributes(&b), vec!["deprecated"]);
    }

    #[test]
    fn test_changed_attributes_after_rename() {
        let renamed = ColorStyle::new("Primary", "c-red", Rgba::from_rgb8(255, 0, 0, 0.5));
        let a = ReplaceableStyle::from_color(&red(), VariableCase::LowerCamel);
        let b = ReplaceableStyle::from_color(&renamed, VariableCase::LowerCamel);
        assert_eq!(a.changed_attributes(&b), vec!["name", "variableName"]);
    }
}
