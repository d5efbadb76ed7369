//! Error types for style export.
//!
//! Everything here is fatal for a run. Problems that only exclude a style or
//! skip a file are recorded in [`Diagnostics`](crate::Diagnostics) instead.

use std::io;
use std::path::PathBuf;

use stylesync_template::TemplateError;

use crate::exporter::ExportStage;

/// Errors reading the latest styles.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The style export could not be read.
    #[error("failed to read styles from {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The style export is not valid JSON of the expected shape.
    #[error("failed to parse styles in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Extraction produced neither colors nor text styles.
    #[error("no styles found in {origin}")]
    NoStyles { origin: String },
}

/// Errors reading or writing the stored snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("corrupt snapshot {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Only one of the two snapshot documents exists.
    #[error("incomplete snapshot: {} is missing", missing.display())]
    Incomplete { missing: PathBuf },

    #[error("failed to write snapshot {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors loading configuration and templates.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// No template was configured or discovered for a declaration.
    #[error("no template declaring '{declaration}' configured")]
    MissingTemplate { declaration: &'static str },

    /// A configured template lacks the declaration it is used for.
    #[error("template {} has no '{declaration}' block", path.display())]
    WrongTemplate {
        path: PathBuf,
        declaration: &'static str,
    },

    #[error(transparent)]
    Template(#[from] TemplateError),
}

/// Fatal problems with the project tree.
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("project root not found: {}", path.display())]
    RootNotFound { path: PathBuf },

    #[error("failed to resolve {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to build match pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// The cause of a failed export.
#[derive(Debug, thiserror::Error)]
pub enum ExportFailure {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error(transparent)]
    Project(#[from] ProjectError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    /// A generated file could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A failed export, with the stage it failed in.
#[derive(Debug, thiserror::Error)]
#[error("export failed while {stage}: {failure}")]
pub struct ExportError {
    pub stage: ExportStage,
    #[source]
    pub failure: ExportFailure,
}

impl ExportError {
    pub fn new(stage: ExportStage, failure: impl Into<ExportFailure>) -> Self {
        Self {
            stage,
            failure: failure.into(),
        }
    }
}
