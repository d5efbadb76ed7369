//! Configuration loaded from `stylesync.yaml`.
//!
//! Every field is optional. Relative paths are resolved against the directory
//! of the config file, so a config checked into a project works from any
//! working directory. Command-line values are layered on top with
//! [`Config::merge`].
//!
//! ```yaml
//! project_root: ..
//! latest_styles: design/styles.json
//! color_template: templates/Colors.swift-template.txt
//! text_template: templates/Fonts.swift-template.txt
//! match_mode: word-boundary
//! summary_file: STYLE_CHANGES.md
//! commit: true
//! ```
//!
//! When a template is not configured, templates under `template_dir`
//! (default `<project_root>/templates`) are searched for one declaring the
//! needed block.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use stylesync_template::{walk_template_dir, CodeTemplate};
use tracing::debug;

use crate::error::ConfigError;
use crate::exporter::{ExportSettings, DEFAULT_EXTENSION};
use crate::model::StyleKind;
use crate::rewrite::MatchMode;

pub const CONFIG_FILE: &str = "stylesync.yaml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub project_root: Option<PathBuf>,
    /// JSON export of the design file.
    pub latest_styles: Option<PathBuf>,
    pub snapshot_dir: Option<PathBuf>,
    /// Where generated files are written.
    pub output_dir: Option<PathBuf>,
    pub color_template: Option<PathBuf>,
    pub text_template: Option<PathBuf>,
    pub template_dir: Option<PathBuf>,
    pub default_extension: Option<String>,
    pub match_mode: Option<MatchMode>,
    /// Markdown change summary destination.
    pub summary_file: Option<PathBuf>,
    /// Commit exported files with git.
    pub commit: Option<bool>,
}

impl Config {
    /// Parses a config file and resolves its relative paths.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&content, path)?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        debug!(config = %path.display(), "loaded config");
        Ok(config.resolved_against(base))
    }

    /// Loads `stylesync.yaml` from `dir` if present.
    pub fn discover(dir: impl AsRef<Path>) -> Result<Option<Self>, ConfigError> {
        let path = dir.as_ref().join(CONFIG_FILE);
        if path.is_file() {
            Self::load(path).map(Some)
        } else {
            Ok(None)
        }
    }

    fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn resolved_against(mut self, base: &Path) -> Self {
        for path in [
            &mut self.project_root,
            &mut self.latest_styles,
            &mut self.snapshot_dir,
            &mut self.output_dir,
            &mut self.color_template,
            &mut self.text_template,
            &mut self.template_dir,
            &mut self.summary_file,
        ]
        .into_iter()
        .flatten()
        {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
        self
    }

    /// Layers `overrides` on top: every field set there wins.
    pub fn merge(self, overrides: Config) -> Self {
        Self {
            project_root: overrides.project_root.or(self.project_root),
            latest_styles: overrides.latest_styles.or(self.latest_styles),
            snapshot_dir: overrides.snapshot_dir.or(self.snapshot_dir),
            output_dir: overrides.output_dir.or(self.output_dir),
            color_template: overrides.color_template.or(self.color_template),
            text_template: overrides.text_template.or(self.text_template),
            template_dir: overrides.template_dir.or(self.template_dir),
            default_extension: overrides.default_extension.or(self.default_extension),
            match_mode: overrides.match_mode.or(self.match_mode),
            summary_file: overrides.summary_file.or(self.summary_file),
            commit: overrides.commit.or(self.commit),
        }
    }

    pub fn project_root(&self) -> PathBuf {
        self.project_root
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn latest_styles(&self) -> PathBuf {
        self.latest_styles
            .clone()
            .unwrap_or_else(|| self.project_root().join("styles.json"))
    }

    pub fn snapshot_dir(&self) -> PathBuf {
        self.snapshot_dir
            .clone()
            .unwrap_or_else(|| self.project_root().join(".stylesync"))
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| self.project_root())
    }

    pub fn template_dir(&self) -> PathBuf {
        self.template_dir
            .clone()
            .unwrap_or_else(|| self.project_root().join("templates"))
    }

    pub fn commit(&self) -> bool {
        self.commit.unwrap_or(false)
    }

    /// Loads the templates and builds export settings.
    ///
    /// # Errors
    ///
    /// Fails when a template cannot be loaded, a configured template lacks
    /// the block it is used for, or no template for a category is found.
    pub fn export_settings(&self, dry_run: bool) -> Result<ExportSettings, ConfigError> {
        let color_template = self.template_for(StyleKind::Color, self.color_template.as_deref())?;
        let text_template = self.template_for(StyleKind::Text, self.text_template.as_deref())?;

        let mut settings =
            ExportSettings::new(self.project_root(), color_template, text_template);
        settings.snapshot_dir = self.snapshot_dir();
        settings.output_dir = self.output_dir();
        settings.default_extension = self
            .default_extension
            .clone()
            .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());
        settings.match_mode = self.match_mode.unwrap_or_default();
        settings.dry_run = dry_run;
        Ok(settings)
    }

    fn template_for(
        &self,
        kind: StyleKind,
        configured: Option<&Path>,
    ) -> Result<CodeTemplate, ConfigError> {
        let declaration = kind.declaration_name();

        if let Some(path) = configured {
            let template = CodeTemplate::load(path)?;
            if !template.declares(declaration) {
                return Err(ConfigError::WrongTemplate {
                    path: path.to_path_buf(),
                    declaration,
                });
            }
            return Ok(template);
        }

        let dir = self.template_dir();
        if !dir.is_dir() {
            return Err(ConfigError::MissingTemplate { declaration });
        }
        for file in walk_template_dir(&dir)? {
            let template = file.load()?;
            if template.declares(declaration) {
                debug!(template = %file.name, %kind, "discovered template");
                return Ok(template);
            }
        }
        Err(ConfigError::MissingTemplate { declaration })
    }
}
