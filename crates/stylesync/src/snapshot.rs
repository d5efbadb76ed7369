//! The stored snapshot of the last export.
//!
//! A snapshot is two JSON documents in one directory, one per style category:
//!
//! ```text
//! <dir>/color-styles.json   { "version": "1.2", "styles": [ColorStyle, ...] }
//! <dir>/text-styles.json    { "version": "1.2", "styles": [TextStyle, ...] }
//! ```
//!
//! Both are overwritten together at the end of a successful export. A
//! directory with neither document means no export happened yet.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::error::SnapshotError;
use crate::model::{ColorStyle, TextStyle};
use crate::version::Version;

pub const COLOR_STYLES_FILE: &str = "color-styles.json";
pub const TEXT_STYLES_FILE: &str = "text-styles.json";

/// Colors and text styles of one export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleSet {
    pub colors: Vec<ColorStyle>,
    pub text_styles: Vec<TextStyle>,
}

impl StyleSet {
    pub fn new(colors: Vec<ColorStyle>, text_styles: Vec<TextStyle>) -> Self {
        Self {
            colors,
            text_styles,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty() && self.text_styles.is_empty()
    }
}

/// A style set with the version it was exported as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedStyleSnapshot {
    pub version: Version,
    pub styles: StyleSet,
}

#[derive(Debug, Deserialize)]
struct SnapshotDocument<S> {
    version: Version,
    styles: Vec<S>,
}

#[derive(Debug, Serialize)]
struct SnapshotDocumentRef<'a, S> {
    version: Version,
    styles: &'a [S],
}

/// Reads and writes snapshots in a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn color_path(&self) -> PathBuf {
        self.dir.join(COLOR_STYLES_FILE)
    }

    pub fn text_path(&self) -> PathBuf {
        self.dir.join(TEXT_STYLES_FILE)
    }

    /// Loads the stored snapshot, or `None` if there is none yet.
    ///
    /// When the two documents disagree on the version, the greater one is
    /// used and the mismatch is reported.
    ///
    /// # Errors
    ///
    /// Fails if only one document exists, or if either cannot be read or
    /// parsed.
    pub fn load(
        &self,
        diagnostics: &mut Diagnostics,
    ) -> Result<Option<VersionedStyleSnapshot>, SnapshotError> {
        let color_path = self.color_path();
        let text_path = self.text_path();

        match (color_path.is_file(), text_path.is_file()) {
            (false, false) => {
                debug!(dir = %self.dir.display(), "no stored snapshot");
                return Ok(None);
            }
            (true, false) => return Err(SnapshotError::Incomplete { missing: text_path }),
            (false, true) => return Err(SnapshotError::Incomplete { missing: color_path }),
            (true, true) => {}
        }

        let colors: SnapshotDocument<ColorStyle> = read_document(&color_path)?;
        let text_styles: SnapshotDocument<TextStyle> = read_document(&text_path)?;

        if colors.version != text_styles.version {
            diagnostics.warn(
                DiagnosticKind::InconsistentSnapshot,
                format!(
                    "{} is at {} but {} is at {}, using the greater",
                    COLOR_STYLES_FILE, colors.version, TEXT_STYLES_FILE, text_styles.version
                ),
            );
        }

        Ok(Some(VersionedStyleSnapshot {
            version: colors.version.max(text_styles.version),
            styles: StyleSet::new(colors.styles, text_styles.styles),
        }))
    }

    /// Serializes a snapshot into `(path, contents)` pairs without writing.
    pub fn render(
        &self,
        snapshot: &VersionedStyleSnapshot,
    ) -> Result<Vec<(PathBuf, String)>, SnapshotError> {
        let colors = SnapshotDocumentRef {
            version: snapshot.version,
            styles: &snapshot.styles.colors,
        };
        let text_styles = SnapshotDocumentRef {
            version: snapshot.version,
            styles: &snapshot.styles.text_styles,
        };

        Ok(vec![
            (self.color_path(), to_pretty_json(&colors)?),
            (self.text_path(), to_pretty_json(&text_styles)?),
        ])
    }

    /// Writes both documents, creating the directory if needed, and returns
    /// their paths.
    pub fn save(&self, snapshot: &VersionedStyleSnapshot) -> Result<Vec<PathBuf>, SnapshotError> {
        let documents = self.render(snapshot)?;

        std::fs::create_dir_all(&self.dir).map_err(|source| SnapshotError::Write {
            path: self.dir.clone(),
            source,
        })?;

        let mut written = Vec::with_capacity(documents.len());
        for (path, contents) in documents {
            std::fs::write(&path, contents).map_err(|source| SnapshotError::Write {
                path: path.clone(),
                source,
            })?;
            written.push(path);
        }
        debug!(version = %snapshot.version, dir = %self.dir.display(), "saved snapshot");
        Ok(written)
    }
}

fn read_document<S: for<'de> Deserialize<'de>>(
    path: &Path,
) -> Result<SnapshotDocument<S>, SnapshotError> {
    let content = std::fs::read_to_string(path).map_err(|source| SnapshotError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| SnapshotError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn to_pretty_json<T: Serialize>(value: &T) -> Result<String, SnapshotError> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    Ok(json)
}
