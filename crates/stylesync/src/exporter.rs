//! The export pipeline.
//!
//! An export walks through fixed stages, never revisiting one:
//!
//! ```text
//! Idle -> StylesExtracted -> Diffed -> ReferencesRewritten -> CodeGenerated
//!      -> SnapshotPersisted -> SummaryPrinted -> Done
//! ```
//!
//! | Stage | Work |
//! |-------|------|
//! | StylesExtracted | read latest styles from the source and the stored snapshot |
//! | Diffed | match previous and latest styles per category |
//! | ReferencesRewritten | carry renames through the project, find uses of deprecated styles |
//! | CodeGenerated | drop unused deprecated styles, render both templates, compute the version |
//! | SnapshotPersisted | store the new style set with its version |
//! | SummaryPrinted | render the change summary |
//!
//! A failure aborts the run and names the stage it happened in. Nothing is
//! resumed: the next run starts from the stored snapshot again. The snapshot
//! is only written after code generation succeeded.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::path::PathBuf;

use stylesync_template::CodeTemplate;
use tracing::{error, info};

use crate::diagnostics::Diagnostics;
use crate::diff::{StyleDiff, StyleUpdate};
use crate::error::{ExportError, ExportFailure};
use crate::model::{ColorStyle, StyleKind, StyleRecord, TextStyle};
use crate::projection::{ReplaceableStyle, VariableCase};
use crate::rewrite::{partition_deprecated, MatchMode, Migration, ProjectFiles, ReferenceRewriter};
use crate::snapshot::{SnapshotStore, StyleSet, VersionedStyleSnapshot};
use crate::source::StyleSource;
use crate::summary::{ChangeSummary, SummaryEntry, SummaryFormat};
use crate::version::{calculate_version, ProjectedStyles, Version};

/// Output base name for colors when the template name does not set one.
pub const DEFAULT_COLOR_BASE_NAME: &str = "ColorStyles";
/// Output base name for text styles when the template name does not set one.
pub const DEFAULT_TEXT_BASE_NAME: &str = "TextStyles";
/// Output extension when a template name does not set one.
pub const DEFAULT_EXTENSION: &str = "swift";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ExportStage {
    Idle,
    StylesExtracted,
    Diffed,
    ReferencesRewritten,
    CodeGenerated,
    SnapshotPersisted,
    SummaryPrinted,
    Done,
}

impl fmt::Display for ExportStage {
    /// The work done to reach this stage, for messages like
    /// "export failed while rewriting references".
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let activity = match self {
            ExportStage::Idle => "starting",
            ExportStage::StylesExtracted => "extracting styles",
            ExportStage::Diffed => "diffing styles",
            ExportStage::ReferencesRewritten => "rewriting references",
            ExportStage::CodeGenerated => "generating code",
            ExportStage::SnapshotPersisted => "persisting the snapshot",
            ExportStage::SummaryPrinted => "summarizing changes",
            ExportStage::Done => "finishing",
        };
        f.write_str(activity)
    }
}

/// Everything an export needs besides the style source.
#[derive(Debug, Clone)]
pub struct ExportSettings {
    pub project_root: PathBuf,
    pub snapshot_dir: PathBuf,
    pub output_dir: PathBuf,
    pub color_template: CodeTemplate,
    pub text_template: CodeTemplate,
    pub default_extension: String,
    pub match_mode: MatchMode,
    pub dry_run: bool,
}

impl ExportSettings {
    /// Settings with generated files and the snapshot placed in
    /// `project_root` and `project_root/.stylesync`.
    pub fn new(
        project_root: impl Into<PathBuf>,
        color_template: CodeTemplate,
        text_template: CodeTemplate,
    ) -> Self {
        let project_root = project_root.into();
        Self {
            snapshot_dir: project_root.join(".stylesync"),
            output_dir: project_root.clone(),
            project_root,
            color_template,
            text_template,
            default_extension: DEFAULT_EXTENSION.to_string(),
            match_mode: MatchMode::default(),
            dry_run: false,
        }
    }

    fn color_output(&self) -> Output<'_> {
        Output::new(self, &self.color_template, DEFAULT_COLOR_BASE_NAME)
    }

    fn text_output(&self) -> Output<'_> {
        Output::new(self, &self.text_template, DEFAULT_TEXT_BASE_NAME)
    }
}

/// Where one template renders to, and the naming convention that implies.
struct Output<'a> {
    template: &'a CodeTemplate,
    path: PathBuf,
    extension: String,
    case: VariableCase,
}

impl<'a> Output<'a> {
    fn new(settings: &ExportSettings, template: &'a CodeTemplate, default_base: &str) -> Self {
        let file_name = template.file_name();
        let extension = file_name
            .extension_or(&settings.default_extension)
            .to_string();
        Self {
            template,
            path: settings
                .output_dir
                .join(file_name.output_file_name(default_base, &settings.default_extension)),
            case: VariableCase::for_extension(&extension),
            extension,
        }
    }
}

/// A rendered output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub kind: StyleKind,
    pub path: PathBuf,
    pub contents: String,
}

/// Result of a completed export.
#[derive(Debug, Clone)]
pub struct ExportReport {
    pub version: Version,
    pub previous_version: Option<Version>,
    pub generated_files: Vec<GeneratedFile>,
    /// Project files whose references were rewritten.
    pub mutated_files: Vec<PathBuf>,
    pub snapshot_files: Vec<PathBuf>,
    pub migrations: Vec<Migration>,
    pub summary: ChangeSummary,
    pub summary_log: String,
    pub summary_markdown: String,
    pub diagnostics: Diagnostics,
    /// Stages passed through, in order.
    pub stages: Vec<ExportStage>,
    /// Nothing was written; paths report what would have been.
    pub dry_run: bool,
}

impl ExportReport {
    /// Generated, rewritten and snapshot files, for staging in a commit.
    pub fn files_to_commit(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = self
            .generated_files
            .iter()
            .map(|f| f.path.clone())
            .chain(self.mutated_files.iter().cloned())
            .chain(self.snapshot_files.iter().cloned())
            .collect();
        files.dedup();
        files
    }

    /// Whether the export produced a new version.
    pub fn version_changed(&self) -> bool {
        self.previous_version != Some(self.version)
    }
}

/// Drives one export.
pub struct StyleExporter<'a> {
    settings: &'a ExportSettings,
    source: &'a dyn StyleSource,
}

impl<'a> StyleExporter<'a> {
    pub fn new(settings: &'a ExportSettings, source: &'a dyn StyleSource) -> Self {
        Self { settings, source }
    }

    /// Runs every stage.
    ///
    /// # Errors
    ///
    /// Returns the first fatal failure together with the stage it happened
    /// in. Per-file and per-style problems do not fail the export; they are
    /// in the report's diagnostics.
    pub fn run(&self) -> Result<ExportReport, ExportError> {
        let settings = self.settings;
        let color_output = settings.color_output();
        let text_output = settings.text_output();
        let store = SnapshotStore::new(&settings.snapshot_dir);

        let mut diagnostics = Diagnostics::new();
        let mut progress = Progress::new(settings.dry_run);

        let (latest, previous) = progress.enter(ExportStage::StylesExtracted, || {
            let latest = self.source.extract(&mut diagnostics)?;
            let previous = store.load(&mut diagnostics)?;
            Ok((latest, previous))
        })?;
        let previous_version = previous.as_ref().map(|s| s.version);
        let previous = previous.map(|s| s.styles).unwrap_or_default();

        let (colors, texts) = progress.enter(ExportStage::Diffed, || {
            Ok((
                CategoryPlan::new(&previous.colors, &latest.colors, color_output.case),
                CategoryPlan::new(&previous.text_styles, &latest.text_styles, text_output.case),
            ))
        })?;

        let migrations: Vec<Migration> = colors
            .migrations
            .iter()
            .chain(&texts.migrations)
            .cloned()
            .collect();

        let (mutated_files, usages) = progress.enter(ExportStage::ReferencesRewritten, || {
            let extensions: BTreeSet<String> = [&color_output, &text_output]
                .iter()
                .map(|o| o.extension.clone())
                .collect();
            let excluded = [color_output.path.clone(), text_output.path.clone()];
            let project = ProjectFiles::collect(
                &settings.project_root,
                &extensions,
                &excluded,
                &mut diagnostics,
            )?;
            let rewriter = ReferenceRewriter::new(settings.match_mode).dry_run(settings.dry_run);

            let mutated = rewriter.apply_migrations(&project, &migrations, &mut diagnostics)?;
            let deprecated_names: Vec<String> = colors
                .deprecated_variable_names()
                .chain(texts.deprecated_variable_names())
                .collect();
            let usages = rewriter.find_usages_after(
                &project,
                &migrations,
                &deprecated_names,
                &mut diagnostics,
            )?;
            Ok((mutated, usages))
        })?;

        let generation = progress.enter(ExportStage::CodeGenerated, || {
            let colors = colors.finish(&usages, &mut diagnostics);
            let texts = texts.finish(&usages, &mut diagnostics);

            let version = calculate_version(
                ProjectedStyles {
                    colors: &colors.previous_projection,
                    text_styles: &texts.previous_projection,
                },
                ProjectedStyles {
                    colors: &colors.projection(),
                    text_styles: &texts.projection(),
                },
                previous_version,
            );

            let mut globals = BTreeMap::new();
            globals.insert("version".to_string(), version.to_string());

            let generated = vec![
                GeneratedFile {
                    kind: StyleKind::Color,
                    path: color_output.path.clone(),
                    contents: color_output
                        .template
                        .generated_code(&colors.groups(), &globals),
                },
                GeneratedFile {
                    kind: StyleKind::Text,
                    path: text_output.path.clone(),
                    contents: text_output
                        .template
                        .generated_code(&texts.groups(), &globals),
                },
            ];
            if !settings.dry_run {
                write_generated(&settings.output_dir, &generated)?;
            }
            Ok((colors, texts, version, generated))
        })?;
        let (colors, texts, version, generated_files) = generation;

        let snapshot_files = progress.enter(ExportStage::SnapshotPersisted, || {
            let snapshot = VersionedStyleSnapshot {
                version,
                styles: StyleSet::new(colors.final_styles(), texts.final_styles()),
            };
            if settings.dry_run {
                Ok(store
                    .render(&snapshot)?
                    .into_iter()
                    .map(|(path, _)| path)
                    .collect())
            } else {
                Ok(store.save(&snapshot)?)
            }
        })?;

        let (summary, summary_log, summary_markdown) =
            progress.enter(ExportStage::SummaryPrinted, || {
                let mut summary = ChangeSummary::default();
                colors.summarize(StyleKind::Color, &mut summary);
                texts.summarize(StyleKind::Text, &mut summary);
                let log = summary.render(SummaryFormat::Log, version)?;
                let markdown = summary.render(SummaryFormat::Markdown, version)?;
                Ok((summary, log, markdown))
            })?;

        progress.enter(ExportStage::Done, || Ok(()))?;
        info!(%version, previous = ?previous_version.map(|v| v.to_string()), "export complete");

        Ok(ExportReport {
            version,
            previous_version,
            generated_files,
            mutated_files,
            snapshot_files,
            migrations,
            summary,
            summary_log,
            summary_markdown,
            diagnostics,
            stages: progress.visited,
            dry_run: settings.dry_run,
        })
    }
}

/// Tracks the current stage and logs transitions.
struct Progress {
    current: ExportStage,
    visited: Vec<ExportStage>,
    dry_run: bool,
}

impl Progress {
    fn new(dry_run: bool) -> Self {
        Self {
            current: ExportStage::Idle,
            visited: vec![ExportStage::Idle],
            dry_run,
        }
    }

    fn enter<T>(
        &mut self,
        stage: ExportStage,
        work: impl FnOnce() -> Result<T, ExportFailure>,
    ) -> Result<T, ExportError> {
        match work() {
            Ok(value) => {
                info!(from = ?self.current, to = ?stage, dry_run = self.dry_run, "export stage");
                self.current = stage;
                self.visited.push(stage);
                Ok(value)
            }
            Err(failure) => {
                error!(stage = ?stage, %failure, "export failed");
                Err(ExportError::new(stage, failure))
            }
        }
    }
}

fn write_generated(output_dir: &std::path::Path, files: &[GeneratedFile]) -> Result<(), ExportFailure> {
    std::fs::create_dir_all(output_dir).map_err(|source| ExportFailure::Write {
        path: output_dir.to_path_buf(),
        source,
    })?;
    for file in files {
        std::fs::write(&file.path, &file.contents).map_err(|source| ExportFailure::Write {
            path: file.path.clone(),
            source,
        })?;
        info!(file = %file.path.display(), "generated");
    }
    Ok(())
}

/// Diff results of one category, before usages are known.
struct CategoryPlan<S> {
    case: VariableCase,
    previous_projection: Vec<ReplaceableStyle>,
    latest: Vec<S>,
    renamed: Vec<(S, S)>,
    added: Vec<S>,
    updated: Vec<StyleUpdate<S>>,
    deprecated: Vec<S>,
    migrations: Vec<Migration>,
}

impl<S: StyleRecord> CategoryPlan<S> {
    fn new(previous: &[S], latest: &[S], case: VariableCase) -> Self {
        let diff = StyleDiff::new(previous, latest);
        let renamed = diff.current_and_migrated_styles();
        let migrations = renamed
            .iter()
            .map(|(old, new)| {
                Migration::new(case.variable_name(old.name()), case.variable_name(new.name()))
            })
            .filter(|m| m.old != m.new)
            .collect();

        Self {
            case,
            previous_projection: previous.iter().map(|s| s.replaceable(case)).collect(),
            latest: latest.to_vec(),
            added: diff.added_styles(),
            updated: diff.updated_styles(case),
            deprecated: diff.deprecated_styles(),
            renamed,
            migrations,
        }
    }

    fn deprecated_variable_names(&self) -> impl Iterator<Item = String> + '_ {
        self.deprecated
            .iter()
            .map(|s| self.case.variable_name(s.name()))
    }

    /// Applies the usage scan: unused deprecated styles and ones whose name
    /// is taken by a current style are dropped.
    fn finish(
        self,
        usages: &BTreeMap<String, Vec<String>>,
        diagnostics: &mut Diagnostics,
    ) -> FinishedCategory<S> {
        let taken: HashSet<String> = self
            .latest
            .iter()
            .map(|s| self.case.variable_name(s.name()))
            .collect();
        let outcome =
            partition_deprecated(self.deprecated, self.case, usages, &taken, diagnostics);

        FinishedCategory {
            case: self.case,
            previous_projection: self.previous_projection,
            latest: self.latest,
            renamed: self.renamed,
            added: self.added,
            updated: self.updated,
            retained: outcome.retained,
            removed: outcome.removed,
        }
    }
}

/// A category ready for rendering.
struct FinishedCategory<S> {
    case: VariableCase,
    previous_projection: Vec<ReplaceableStyle>,
    latest: Vec<S>,
    renamed: Vec<(S, S)>,
    added: Vec<S>,
    updated: Vec<StyleUpdate<S>>,
    retained: Vec<(S, Vec<String>)>,
    removed: Vec<S>,
}

impl<S: StyleRecord> FinishedCategory<S> {
    /// Retained deprecated styles first, then the latest ones.
    fn final_styles(&self) -> Vec<S> {
        self.retained
            .iter()
            .map(|(style, _)| style.clone())
            .chain(self.latest.iter().cloned())
            .collect()
    }

    fn groups(&self) -> Vec<Vec<ReplaceableStyle>> {
        vec![
            self.retained
                .iter()
                .map(|(style, _)| style.replaceable(self.case))
                .collect(),
            self.latest.iter().map(|s| s.replaceable(self.case)).collect(),
        ]
    }

    fn projection(&self) -> Vec<ReplaceableStyle> {
        self.groups().into_iter().flatten().collect()
    }

    fn summarize(&self, kind: StyleKind, summary: &mut ChangeSummary) {
        summary
            .added
            .extend(self.added.iter().map(|s| SummaryEntry::new(kind, s.name())));
        summary.updated.extend(self.renamed.iter().map(|(old, new)| {
            SummaryEntry::new(kind, new.name()).with_detail(format!("renamed from {}", old.name()))
        }));
        summary.updated.extend(self.updated.iter().map(|update| {
            let detail = if update.previous.is_deprecated() && !update.current.is_deprecated() {
                "restored".to_string()
            } else {
                format!("changed {}", update.changed_attributes.join(", "))
            };
            SummaryEntry::new(kind, update.current.name()).with_detail(detail)
        }));
        summary
            .removed
            .extend(self.removed.iter().map(|s| SummaryEntry::new(kind, s.name())));
        summary.deprecated.extend(
            self.retained
                .iter()
                .map(|(s, files)| SummaryEntry::new(kind, s.name()).with_files(files.clone())),
        );
    }
}

/// Convenience for exporting colors and text styles from in-memory values.
pub fn export_styles(
    settings: &ExportSettings,
    colors: Vec<ColorStyle>,
    text_styles: Vec<TextStyle>,
) -> Result<ExportReport, ExportError> {
    let source = StyleSet::new(colors, text_styles);
    StyleExporter::new(settings, &source).run()
}
