//! Human-readable report of what an export changed.
//!
//! The summary is rendered with the same template engine as generated code,
//! from two embedded templates: a plain log and a markdown version suitable
//! for a commit or pull request description. Sections without entries are
//! left out.

use std::collections::BTreeMap;

use stylesync_template::{CodeTemplate, Replacement, TemplateError};

use crate::model::StyleKind;
use crate::version::Version;

const LOG_TEMPLATE: &str = include_str!("log-template.txt");
const MARKDOWN_TEMPLATE: &str = include_str!("markdown-template.txt");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryFormat {
    Log,
    Markdown,
}

/// One line of the summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryEntry {
    pub kind: StyleKind,
    pub name: String,
    /// What changed, for updated entries.
    pub detail: Option<String>,
    /// Referencing files, for deprecated entries.
    pub files: Vec<String>,
}

impl SummaryEntry {
    pub fn new(kind: StyleKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            detail: None,
            files: Vec::new(),
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_files(mut self, files: Vec<String>) -> Self {
        self.files = files;
        self
    }

    fn replacement(&self, declaration: &str) -> Replacement {
        Replacement::new(declaration)
            .with("kind", self.kind.to_string())
            .with("name", self.name.clone())
            .with("detail", self.detail.clone().unwrap_or_default())
            .with("files", self.files.join(", "))
            .with(
                "markdownFiles",
                self.files
                    .iter()
                    .map(|f| format!("`{}`", f))
                    .collect::<Vec<_>>()
                    .join(", "),
            )
    }
}

/// Changes of one export, by section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSummary {
    pub added: Vec<SummaryEntry>,
    /// Attribute changes and renames.
    pub updated: Vec<SummaryEntry>,
    /// Styles dropped from generated code.
    pub removed: Vec<SummaryEntry>,
    /// Styles kept as deprecated because the project still uses them.
    pub deprecated: Vec<SummaryEntry>,
}

impl ChangeSummary {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
            && self.updated.is_empty()
            && self.removed.is_empty()
            && self.deprecated.is_empty()
    }

    /// Renders the summary for `version`.
    pub fn render(&self, format: SummaryFormat, version: Version) -> Result<String, TemplateError> {
        let source = match format {
            SummaryFormat::Log => LOG_TEMPLATE,
            SummaryFormat::Markdown => MARKDOWN_TEMPLATE,
        };
        let template = CodeTemplate::parse(source)?;

        let mut items = Vec::new();
        for (section, entries) in [
            ("added", &self.added),
            ("updated", &self.updated),
            ("removed", &self.removed),
            ("deprecated", &self.deprecated),
        ] {
            if entries.is_empty() {
                continue;
            }
            items.push(Replacement::new(format!("{}Header", section)));
            items.extend(entries.iter().map(|entry| entry.replacement(section)));
        }
        if items.is_empty() {
            items.push(Replacement::new("unchanged"));
        }

        let mut globals = BTreeMap::new();
        globals.insert("version".to_string(), version.to_string());
        Ok(template.generated_code(&[items], &globals))
    }
}
