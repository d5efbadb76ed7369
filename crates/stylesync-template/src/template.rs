//! Parsed code templates and rendering.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::TemplateError;
use crate::file_name::TemplateFileName;
use crate::parse::{parse_segments, Block, Segment};
use crate::replaceable::Replaceable;
use crate::substitute::substitute;

/// A parsed code template.
///
/// Parse once, render as often as needed. Rendering is a pure function of the
/// template and its input, so equal input always yields byte-identical
/// output.
///
/// # Example
///
/// ```rust
/// use std::collections::BTreeMap;
/// use stylesync_template::{CodeTemplate, Replacement};
///
/// let template = CodeTemplate::parse(
///     "// v{{ version }}\n<color>\nlet {{ variableName }} = \"{{ hex }}\" {% deprecated=false %}\n@deprecated let {{ variableName }} = \"{{ hex }}\" {% deprecated=true %}\n</color>\n",
/// ).unwrap();
///
/// let groups = vec![vec![
///     Replacement::new("color").with("variableName", "red").with("hex", "#FF0000"),
///     Replacement::new("color").with("variableName", "old").with("hex", "#000000").deprecated(true),
/// ]];
/// let mut globals = BTreeMap::new();
/// globals.insert("version".to_string(), "1.2".to_string());
///
/// let code = template.generated_code(&groups, &globals);
/// assert_eq!(
///     code,
///     "// v1.2\nlet red = \"#FF0000\"\n\n@deprecated let old = \"#000000\"\n",
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTemplate {
    segments: Vec<Segment>,
    file_name: TemplateFileName,
}

impl CodeTemplate {
    /// Parses an inline template. No file name metadata is attached.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::NoDeclarations`] if the template contains no
    /// declaration block.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        Self::parse_with_origin(source, "<inline>")
    }

    fn parse_with_origin(source: &str, origin: &str) -> Result<Self, TemplateError> {
        Ok(Self {
            segments: parse_segments(source, origin)?,
            file_name: TemplateFileName::default(),
        })
    }

    /// Reads and parses a template file, picking up the output base name and
    /// extension encoded in its file name.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TemplateError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| TemplateError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let template = Self::parse_with_origin(&source, &path.display().to_string())?;
        Ok(template.with_file_name(TemplateFileName::parse(&file_name)))
    }

    /// Replaces the file name metadata.
    pub fn with_file_name(mut self, file_name: TemplateFileName) -> Self {
        self.file_name = file_name;
        self
    }

    pub fn file_name(&self) -> &TemplateFileName {
        &self.file_name
    }

    /// Distinct declaration names, in order of first appearance.
    pub fn declaration_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for block in self.blocks() {
            if !names.contains(&block.name.as_str()) {
                names.push(&block.name);
            }
        }
        names
    }

    /// Whether the template has a block for `declaration_name`.
    pub fn declares(&self, declaration_name: &str) -> bool {
        self.blocks().any(|b| b.name == declaration_name)
    }

    /// Renders the template.
    ///
    /// Every declaration block is expanded in place with the items bound to
    /// it, taken from `groups` in group order and then item order. Items are
    /// separated by a blank line (none for compact blocks). Items bound to a
    /// declaration the template does not have are ignored; a block with no
    /// items renders as nothing.
    ///
    /// Literal text outside blocks resolves placeholders against `globals`.
    pub fn generated_code<R: Replaceable>(
        &self,
        groups: &[Vec<R>],
        globals: &BTreeMap<String, String>,
    ) -> String {
        let mut output = String::new();

        for segment in &self.segments {
            match segment {
                Segment::Text(text) => {
                    output.push_str(&substitute(text, |key| {
                        globals.get(key).map(String::as_str)
                    }));
                }
                Segment::Block(block) => {
                    let rendered: Vec<String> = groups
                        .iter()
                        .flatten()
                        .filter(|item| item.declaration_name() == block.name)
                        .map(|item| render_item(block, item))
                        .collect();
                    let separator = if block.compact { "" } else { "\n" };
                    output.push_str(&rendered.join(separator));
                }
            }
        }

        output
    }

    fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Block(block) => Some(block),
            Segment::Text(_) => None,
        })
    }
}

fn render_item<R: Replaceable>(block: &Block, item: &R) -> String {
    let deprecated = item.is_deprecated();
    let mut rendered = String::new();
    for line in &block.lines {
        if line.visibility.shows(deprecated) {
            rendered.push_str(&substitute(&line.text, |key| item.value(key)));
        }
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replaceable::Replacement;

    const SWIFT: &str = "\
import UIKit

extension UIColor {
<color>
    @available(*, deprecated, message: \"Removed from the design file\") {% deprecated=true %}
    static let {{ variableName }} = UIColor(hex: \"{{ hex }}\")
</color>
}
";

    fn color(name: &str, hex: &str) -> Replacement {
        Replacement::new("color")
            .with("variableName", name)
            .with("hex", hex)
    }

    fn no_globals() -> BTreeMap<String, String> {
        BTreeMap::new()
    }

    #[test]
    fn test_renders_items_with_blank_line_between() {
        let template = CodeTemplate::parse(SWIFT).unwrap();
        let code = template.generated_code(
            &[vec![color("red", "#FF0000"), color("blue", "#0000FF")]],
            &no_globals(),
        );

        assert_eq!(
            code,
            "import UIKit\n\nextension UIColor {\n    static let red = UIColor(hex: \"#FF0000\")\n\n    static let blue = UIColor(hex: \"#0000FF\")\n}\n"
        );
    }

    #[test]
    fn test_deprecated_line_only_for_deprecated_items() {
        let template = CodeTemplate::parse(SWIFT).unwrap();
        let code = template.generated_code(
            &[vec![color("old", "#111111").deprecated(true)]],
            &no_globals(),
        );
        assert!(code.contains("    @available(*, deprecated, message: \"Removed from the design file\")\n    static let old"));

        let code = template.generated_code(&[vec![color("new", "#111111")]], &no_globals());
        assert!(!code.contains("@available"));
    }

    #[test]
    fn test_compact_block() {
        let template = CodeTemplate::parse("<item compact>\n- {{ name }}\n</item>\n").unwrap();
        let items = vec![
            Replacement::new("item").with("name", "a"),
            Replacement::new("item").with("name", "b"),
        ];
        assert_eq!(template.generated_code(&[items], &no_globals()), "- a\n- b\n");
    }

    #[test]
    fn test_groups_render_in_group_order() {
        let template = CodeTemplate::parse("<color compact>\n{{ variableName }}\n</color>\n").unwrap();
        let groups = vec![
            vec![color("deprecatedOne", "#1")],
            vec![color("fresh", "#2"), color("another", "#3")],
        ];
        assert_eq!(
            template.generated_code(&groups, &no_globals()),
            "deprecatedOne\nfresh\nanother\n"
        );
    }

    #[test]
    fn test_items_bound_by_declaration_name() {
        let template =
            CodeTemplate::parse("<color compact>\nC {{ v }}\n</color>\n<textStyle compact>\nT {{ v }}\n</textStyle>\n")
                .unwrap();
        let groups = vec![vec![
            Replacement::new("textStyle").with("v", "body"),
            Replacement::new("color").with("v", "red"),
            Replacement::new("unknown").with("v", "ignored"),
        ]];
        assert_eq!(
            template.generated_code(&groups, &no_globals()),
            "C red\nT body\n"
        );
    }

    #[test]
    fn test_empty_block_renders_nothing() {
        let template = CodeTemplate::parse("head\n<color>\nx\n</color>\ntail\n").unwrap();
        let groups: Vec<Vec<Replacement>> = vec![];
        assert_eq!(template.generated_code(&groups, &no_globals()), "head\ntail\n");
    }

    #[test]
    fn test_globals_in_literal_text_only() {
        let template =
            CodeTemplate::parse("// {{ version }}\n<color compact>\n{{ version }}\n</color>\n").unwrap();
        let mut globals = BTreeMap::new();
        globals.insert("version".to_string(), "2.0".to_string());

        let code = template.generated_code(&[vec![color("red", "#F00")]], &globals);
        assert_eq!(code, "// 2.0\n{{ version }}\n");
    }

    #[test]
    fn test_declaration_names() {
        let template = CodeTemplate::parse(
            "<color>\na\n</color>\n<textStyle>\nb\n</textStyle>\n<color>\nc\n</color>\n",
        )
        .unwrap();
        assert_eq!(template.declaration_names(), vec!["color", "textStyle"]);
        assert!(template.declares("textStyle"));
        assert!(!template.declares("added"));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let template = CodeTemplate::parse(SWIFT).unwrap();
        let groups = vec![vec![color("red", "#FF0000"), color("old", "#000000").deprecated(true)]];
        let first = template.generated_code(&groups, &no_globals());
        let second = template.generated_code(&groups, &no_globals());
        assert_eq!(first, second);
    }
}
