//! Structured, non-fatal problems found during an export.
//!
//! Components receive a `&mut Diagnostics` and record what they skipped or
//! dropped. Every record is also emitted through `tracing`, so a run with
//! logging enabled shows it as it happens, while callers and tests can
//! inspect the collected records afterwards.

use std::fmt;

use tracing::{error, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Warning,
    Error,
}

/// What went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// A source style lacks a required attribute or has one out of range.
    InvalidStyle,
    /// A text style color matches no shared color.
    UnmatchedTextColor,
    /// Two source styles share an identifier.
    DuplicateIdentifier,
    /// A project file could not be read.
    UnreadableFile,
    /// A project file could not be written back.
    UnwritableFile,
    /// A project directory could not be listed.
    UnreadableDirectory,
    /// A deprecated style was dropped because a new style took its name.
    NamingCollision,
    /// The two snapshot documents carry different versions.
    InconsistentSnapshot,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DiagnosticKind::InvalidStyle => "invalid style",
            DiagnosticKind::UnmatchedTextColor => "unmatched text color",
            DiagnosticKind::DuplicateIdentifier => "duplicate identifier",
            DiagnosticKind::UnreadableFile => "unreadable file",
            DiagnosticKind::UnwritableFile => "unwritable file",
            DiagnosticKind::UnreadableDirectory => "unreadable directory",
            DiagnosticKind::NamingCollision => "naming collision",
            DiagnosticKind::InconsistentSnapshot => "inconsistent snapshot",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Collector of diagnostics for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    records: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        let message = message.into();
        warn!(%kind, "{}", message);
        self.records.push(Diagnostic {
            severity: Severity::Warning,
            kind,
            message,
        });
    }

    pub fn error(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        let message = message.into();
        error!(%kind, "{}", message);
        self.records.push(Diagnostic {
            severity: Severity::Error,
            kind,
            message,
        });
    }

    pub fn records(&self) -> &[Diagnostic] {
        &self.records
    }

    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.records.iter().filter(move |d| d.kind == kind)
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}
