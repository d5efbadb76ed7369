use std::fmt;

use super::{ColorStyle, TextStyle};
use crate::projection::{ReplaceableStyle, VariableCase};

/// Behavior shared by every style category.
///
/// The differ is generic over this trait, so colors and text styles go
/// through the same matching code.
pub trait StyleRecord: Clone {
    fn name(&self) -> &str;

    /// Stable across renames; the only key used for matching.
    fn identifier(&self) -> &str;

    fn is_deprecated(&self) -> bool;

    /// A copy with the deprecation flag set.
    fn deprecated(&self) -> Self;

    /// The template-facing view of this style.
    fn replaceable(&self, case: VariableCase) -> ReplaceableStyle;
}

impl StyleRecord for ColorStyle {
    fn name(&self) -> &str {
        ColorStyle::name(self)
    }

    fn identifier(&self) -> &str {
        ColorStyle::identifier(self)
    }

    fn is_deprecated(&self) -> bool {
        ColorStyle::is_deprecated(self)
    }

    fn deprecated(&self) -> Self {
        ColorStyle::deprecated(self)
    }

    fn replaceable(&self, case: VariableCase) -> ReplaceableStyle {
        ReplaceableStyle::from_color(self, case)
    }
}

impl StyleRecord for TextStyle {
    fn name(&self) -> &str {
        TextStyle::name(self)
    }

    fn identifier(&self) -> &str {
        TextStyle::identifier(self)
    }

    fn is_deprecated(&self) -> bool {
        TextStyle::is_deprecated(self)
    }

    fn deprecated(&self) -> Self {
        TextStyle::deprecated(self)
    }

    fn replaceable(&self, case: VariableCase) -> ReplaceableStyle {
        ReplaceableStyle::from_text(self, case)
    }
}

/// Style category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StyleKind {
    Color,
    Text,
}

impl StyleKind {
    /// The template declaration name for this category.
    pub fn declaration_name(self) -> &'static str {
        match self {
            StyleKind::Color => "color",
            StyleKind::Text => "textStyle",
        }
    }
}

impl fmt::Display for StyleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleKind::Color => write!(f, "color"),
            StyleKind::Text => write!(f, "text style"),
        }
    }
}

/// Either kind of style.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Style {
    Color(ColorStyle),
    Text(TextStyle),
}

impl Style {
    pub fn kind(&self) -> StyleKind {
        match self {
            Style::Color(_) => StyleKind::Color,
            Style::Text(_) => StyleKind::Text,
        }
    }
}

impl StyleRecord for Style {
    fn name(&self) -> &str {
        match self {
            Style::Color(style) => style.name(),
            Style::Text(style) => style.name(),
        }
    }

    fn identifier(&self) -> &str {
        match self {
            Style::Color(style) => style.identifier(),
            Style::Text(style) => style.identifier(),
        }
    }

    fn is_deprecated(&self) -> bool {
        match self {
            Style::Color(style) => style.is_deprecated(),
            Style::Text(style) => style.is_deprecated(),
        }
    }

    fn deprecated(&self) -> Self {
        match self {
            Style::Color(style) => Style::Color(style.deprecated()),
            Style::Text(style) => Style::Text(style.deprecated()),
        }
    }

    fn replaceable(&self, case: VariableCase) -> ReplaceableStyle {
        match self {
            Style::Color(style) => style.replaceable(case),
            Style::Text(style) => style.replaceable(case),
        }
    }
}

impl From<ColorStyle> for Style {
    fn from(style: ColorStyle) -> Self {
        Style::Color(style)
    }
}

impl From<TextStyle> for Style {
    fn from(style: TextStyle) -> Self {
        Style::Text(style)
    }
}
