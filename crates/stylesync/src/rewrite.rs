//! Reference rewriting across a project tree.
//!
//! When a style is renamed in the design file its generated variable name
//! changes, and every place in the project that used the old name has to
//! follow. The rewriter works on the files that could reference generated
//! code: every file under the project root whose extension is one of the
//! generated extensions, minus the generated files themselves.
//!
//! Matching is textual. [`MatchMode::Literal`] replaces every occurrence,
//! including ones embedded in longer identifiers. [`MatchMode::WordBoundary`]
//! only replaces occurrences with no identifier character on either side.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::error::ProjectError;
use crate::model::StyleRecord;
use crate::projection::VariableCase;

/// How variable names are located in project files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchMode {
    /// Plain substring matching.
    #[default]
    Literal,
    /// Occurrences must not touch another identifier character.
    WordBoundary,
}

/// A variable rename to carry through the project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Migration {
    pub old: String,
    pub new: String,
}

impl Migration {
    pub fn new(old: impl Into<String>, new: impl Into<String>) -> Self {
        Self {
            old: old.into(),
            new: new.into(),
        }
    }
}

/// The candidate files of a project, in sorted walk order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectFiles {
    root: PathBuf,
    files: Vec<PathBuf>,
}

impl ProjectFiles {
    /// Walks `root` and keeps files whose extension is in `extensions`.
    ///
    /// Hidden directories and `target` are not entered. Paths in `excluded`
    /// are skipped; they are compared after canonicalization, so they may be
    /// given relative to the working directory. A directory that cannot be
    /// listed is reported and skipped.
    pub fn collect(
        root: impl AsRef<Path>,
        extensions: &BTreeSet<String>,
        excluded: &[PathBuf],
        diagnostics: &mut Diagnostics,
    ) -> Result<Self, ProjectError> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(ProjectError::RootNotFound {
                path: root.to_path_buf(),
            });
        }
        let root = root.canonicalize().map_err(|source| ProjectError::Io {
            path: root.to_path_buf(),
            source,
        })?;
        let excluded: HashSet<PathBuf> = excluded
            .iter()
            .filter_map(|path| path.canonicalize().ok())
            .collect();

        let mut files = Vec::new();
        walk_project_dir(&root, extensions, &excluded, &mut files, diagnostics);
        debug!(root = %root.display(), count = files.len(), "collected project files");

        Ok(Self { root, files })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// `path` relative to the root, with `/` separators.
    pub fn relative_name(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace(std::path::MAIN_SEPARATOR, "/")
    }
}

fn walk_project_dir(
    current: &Path,
    extensions: &BTreeSet<String>,
    excluded: &HashSet<PathBuf>,
    files: &mut Vec<PathBuf>,
    diagnostics: &mut Diagnostics,
) {
    let entries = match std::fs::read_dir(current) {
        Ok(entries) => entries,
        Err(err) => {
            diagnostics.warn(
                DiagnosticKind::UnreadableDirectory,
                format!("{}: {}", current.display(), err),
            );
            return;
        }
    };

    let mut paths: Vec<PathBuf> = entries.filter_map(|e| e.ok().map(|e| e.path())).collect();
    paths.sort();

    for path in paths {
        if path.is_dir() {
            if !is_skipped_dir(&path) {
                walk_project_dir(&path, extensions, excluded, files, diagnostics);
            }
        } else if path.is_file() && has_extension(&path, extensions) && !excluded.contains(&path) {
            files.push(path);
        }
    }
}

fn is_skipped_dir(path: &Path) -> bool {
    match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => name.starts_with('.') || name == "target",
        None => false,
    }
}

fn has_extension(path: &Path, extensions: &BTreeSet<String>) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| extensions.contains(e))
}

/// Rewrites and scans project files.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceRewriter {
    mode: MatchMode,
    dry_run: bool,
}

impl ReferenceRewriter {
    pub fn new(mode: MatchMode) -> Self {
        Self {
            mode,
            dry_run: false,
        }
    }

    /// In dry-run mode files are never written; the mutated list reports what
    /// would have changed.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Applies every migration to every candidate file and returns the files
    /// whose content changed, in walk order.
    ///
    /// All migrations are applied in a single pass over each file, so chains
    /// like `a -> b, b -> c` do not cascade. An occurrence that already sits
    /// inside the new name is left alone, so running the same migrations
    /// again changes nothing. Files that cannot be read or written are
    /// reported and skipped.
    pub fn apply_migrations(
        &self,
        project: &ProjectFiles,
        migrations: &[Migration],
        diagnostics: &mut Diagnostics,
    ) -> Result<Vec<PathBuf>, ProjectError> {
        let Some(rewrite) = Rewrite::new(migrations, self.mode)? else {
            return Ok(Vec::new());
        };

        let mut mutated = Vec::new();
        for path in project.files() {
            let Some(content) = read_file(path, diagnostics) else {
                continue;
            };
            let rewritten = rewrite.apply(&content);
            if rewritten == content {
                continue;
            }

            if !self.dry_run {
                if let Err(err) = std::fs::write(path, &rewritten) {
                    diagnostics.warn(
                        DiagnosticKind::UnwritableFile,
                        format!("{}: {}", path.display(), err),
                    );
                    continue;
                }
            }
            info!(file = %project.relative_name(path), dry_run = self.dry_run, "rewrote references");
            mutated.push(path.clone());
        }

        Ok(mutated)
    }

    /// Maps each variable name to the files that mention it.
    ///
    /// Every name is searched on its own, so a name found only inside a
    /// longer one still counts. Names found nowhere are absent from the
    /// result. File names are relative to the project root and sorted.
    pub fn find_usages(
        &self,
        project: &ProjectFiles,
        variable_names: &[String],
        diagnostics: &mut Diagnostics,
    ) -> Result<BTreeMap<String, Vec<String>>, ProjectError> {
        self.scan_usages(project, variable_names, None, diagnostics)
    }

    /// Like [`find_usages`](Self::find_usages), but sees files as they are
    /// after `migrations`.
    ///
    /// Once migrations were written this is the same scan. In dry-run mode
    /// nothing was written, so the migrations are applied in memory first.
    pub fn find_usages_after(
        &self,
        project: &ProjectFiles,
        migrations: &[Migration],
        variable_names: &[String],
        diagnostics: &mut Diagnostics,
    ) -> Result<BTreeMap<String, Vec<String>>, ProjectError> {
        let pending = if self.dry_run {
            Rewrite::new(migrations, self.mode)?
        } else {
            None
        };
        self.scan_usages(project, variable_names, pending.as_ref(), diagnostics)
    }

    fn scan_usages(
        &self,
        project: &ProjectFiles,
        variable_names: &[String],
        pending: Option<&Rewrite>,
        diagnostics: &mut Diagnostics,
    ) -> Result<BTreeMap<String, Vec<String>>, ProjectError> {
        let mut matchers = Vec::new();
        for name in variable_names.iter().filter(|n| !n.is_empty()) {
            if let Some(matcher) = Matcher::new(std::iter::once(name.as_str()), self.mode)? {
                matchers.push((name.as_str(), matcher));
            }
        }
        if matchers.is_empty() {
            return Ok(BTreeMap::new());
        }

        let mut usages = project.files().iter().fold(
            BTreeMap::<String, Vec<String>>::new(),
            |mut usages, path| {
                if let Some(content) = read_file(path, diagnostics) {
                    let content = match pending {
                        Some(rewrite) => rewrite.apply(&content),
                        None => content,
                    };
                    for (name, matcher) in &matchers {
                        if matcher.is_found(&content) {
                            usages
                                .entry(name.to_string())
                                .or_default()
                                .push(project.relative_name(path));
                        }
                    }
                }
                usages
            },
        );
        for files in usages.values_mut() {
            files.sort();
            files.dedup();
        }
        Ok(usages)
    }
}

fn read_file(path: &Path, diagnostics: &mut Diagnostics) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(err) => {
            diagnostics.warn(
                DiagnosticKind::UnreadableFile,
                format!("{}: {}", path.display(), err),
            );
            None
        }
    }
}

/// A set of renames ready to apply to text.
struct Rewrite {
    replacements: BTreeMap<String, String>,
    matcher: Matcher,
}

impl Rewrite {
    fn new(migrations: &[Migration], mode: MatchMode) -> Result<Option<Self>, ProjectError> {
        let replacements: BTreeMap<String, String> = migrations
            .iter()
            .filter(|m| m.old != m.new && !m.old.is_empty())
            .map(|m| (m.old.clone(), m.new.clone()))
            .collect();
        let Some(matcher) = Matcher::new(replacements.keys().map(String::as_str), mode)? else {
            return Ok(None);
        };
        Ok(Some(Self {
            replacements,
            matcher,
        }))
    }

    fn apply(&self, text: &str) -> String {
        let mut result = String::with_capacity(text.len());
        let mut last = 0;
        for m in self.matcher.matches(text) {
            let Some(new) = self.replacements.get(m.as_str()) else {
                continue;
            };
            if within_name(text, m.start(), m.as_str(), new) {
                continue;
            }
            result.push_str(&text[last..m.start()]);
            result.push_str(new);
            last = m.end();
        }
        result.push_str(&text[last..]);
        result
    }
}

/// Whether the occurrence of `old` at `start` is part of an occurrence of
/// `name` that contains it.
fn within_name(text: &str, start: usize, old: &str, name: &str) -> bool {
    name.match_indices(old).any(|(offset, _)| {
        start >= offset
            && text.is_char_boundary(start - offset)
            && text[start - offset..].starts_with(name)
    })
}

/// Finds any of a set of names in text, longest name first at each position.
struct Matcher {
    regex: Regex,
    mode: MatchMode,
}

impl Matcher {
    fn new<'a>(
        names: impl Iterator<Item = &'a str>,
        mode: MatchMode,
    ) -> Result<Option<Self>, ProjectError> {
        let mut names: Vec<&str> = names.collect();
        if names.is_empty() {
            return Ok(None);
        }
        names.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
        names.dedup();

        let pattern = names
            .iter()
            .map(|name| regex::escape(name))
            .collect::<Vec<_>>()
            .join("|");
        Ok(Some(Self {
            regex: Regex::new(&pattern)?,
            mode,
        }))
    }

    fn accepts(&self, text: &str, m: &regex::Match<'_>) -> bool {
        self.mode == MatchMode::Literal || at_boundary(text, m.start(), m.end())
    }

    fn matches<'t>(&self, text: &'t str) -> Vec<regex::Match<'t>> {
        self.regex
            .find_iter(text)
            .filter(|m| self.accepts(text, m))
            .collect()
    }

    fn is_found(&self, text: &str) -> bool {
        self.regex.find_iter(text).any(|m| self.accepts(text, &m))
    }
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Whether `text[start..end]` is not glued to a surrounding identifier.
///
/// A trailing `-` followed by an identifier character also counts as glued,
/// so `brand-red` does not match inside `brand-red-dark`.
fn at_boundary(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    if before.is_some_and(is_identifier_char) {
        return false;
    }

    let mut after = text[end..].chars();
    match after.next() {
        Some(c) if is_identifier_char(c) => false,
        Some('-') => !after.next().is_some_and(is_identifier_char),
        _ => true,
    }
}

/// Deprecated styles split by whether they stay in generated code.
#[derive(Debug, Clone, PartialEq)]
pub struct DeprecationOutcome<S> {
    /// Still referenced; kept with the files that reference them.
    pub retained: Vec<(S, Vec<String>)>,
    /// Unused, or displaced by a new style with the same variable name.
    pub removed: Vec<S>,
}

/// Decides which deprecated styles survive.
///
/// A deprecated style survives when `usages` records at least one file for
/// its variable name, and no name in `taken_names` (the variable names of the
/// new styles, rename targets included) equals it. Collisions are reported.
pub fn partition_deprecated<S: StyleRecord>(
    deprecated: Vec<S>,
    case: VariableCase,
    usages: &BTreeMap<String, Vec<String>>,
    taken_names: &HashSet<String>,
    diagnostics: &mut Diagnostics,
) -> DeprecationOutcome<S> {
    let mut outcome = DeprecationOutcome {
        retained: Vec::new(),
        removed: Vec::new(),
    };

    for style in deprecated {
        let variable_name = case.variable_name(style.name());
        match usages.get(&variable_name) {
            Some(files) if !files.is_empty() => {
                if taken_names.contains(&variable_name) {
                    diagnostics.warn(
                        DiagnosticKind::NamingCollision,
                        format!(
                            "deprecated style '{}' dropped: '{}' now names a current style",
                            style.name(),
                            variable_name
                        ),
                    );
                    outcome.removed.push(style);
                } else {
                    outcome.retained.push((style, files.clone()));
                }
            }
            _ => {
                debug!(style = style.name(), "dropping unused deprecated style");
                outcome.removed.push(style);
            }
        }
    }

    outcome
}
