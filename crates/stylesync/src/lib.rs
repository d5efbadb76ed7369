//! # Stylesync - Shared Styles as Versioned Code
//!
//! `stylesync` keeps the shared colors and text styles of a design file in
//! sync with a code base. Each export compares the latest styles against the
//! snapshot stored by the previous export and then:
//!
//! 1. matches styles by their stable identifier, so renames are recognized
//! 2. rewrites references to renamed styles throughout the project
//! 3. keeps removed styles that are still referenced, flagged as deprecated,
//!    and drops the rest
//! 4. renders the styles through code templates (see [`stylesync_template`])
//! 5. bumps a `major.minor` version: major when a style disappears from the
//!    generated code, minor for any other change
//! 6. stores the new snapshot and summarizes what changed
//!
//! ## Example
//!
//! ```rust,no_run
//! use stylesync::{Config, JsonStyleSource, StyleExporter};
//!
//! let config = Config::discover(".")?.unwrap_or_default();
//! let settings = config.export_settings(false)?;
//! let source = JsonStyleSource::new(config.latest_styles());
//!
//! let report = StyleExporter::new(&settings, &source).run()?;
//! println!("{}", report.summary_log);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Modules
//!
//! - [`model`]: colors, text styles and the [`StyleRecord`] trait
//! - [`projection`]: flattening a style into template values
//! - [`diff`]: identifier matching between two style lists
//! - [`rewrite`]: project walking, reference migration, usage scanning
//! - [`version`]: version arithmetic
//! - [`snapshot`]: the stored snapshot documents
//! - [`exporter`]: the staged export pipeline
//!
//! Problems that skip a style or a file never abort an export; they are
//! collected in [`Diagnostics`] and logged through `tracing`.

pub mod config;
pub mod diagnostics;
pub mod diff;
pub mod error;
pub mod exporter;
pub mod model;
mod naming;
pub mod projection;
pub mod rewrite;
pub mod snapshot;
pub mod source;
pub mod summary;
pub mod version;

pub use config::{Config, CONFIG_FILE};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Severity};
pub use diff::{StyleDiff, StyleUpdate};
pub use error::{
    ConfigError, ExportError, ExportFailure, ProjectError, SnapshotError, SourceError,
};
pub use exporter::{
    export_styles, ExportReport, ExportSettings, ExportStage, GeneratedFile, StyleExporter,
};
pub use model::{ColorStyle, Rgba, Style, StyleKind, StyleRecord, TextStyle};
pub use projection::{ReplaceableStyle, VariableCase};
pub use rewrite::{MatchMode, Migration, ProjectFiles, ReferenceRewriter};
pub use snapshot::{SnapshotStore, StyleSet, VersionedStyleSnapshot};
pub use source::{JsonStyleSource, StyleSource};
pub use summary::{ChangeSummary, SummaryEntry, SummaryFormat};
pub use version::{calculate_version, Version};
