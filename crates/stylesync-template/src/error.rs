//! Error types for template loading.

use std::path::PathBuf;

/// Errors raised while loading or parsing a code template.
///
/// Rendering itself is infallible; only getting a template into memory can
/// fail.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// The template file could not be read.
    #[error("failed to read template {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The template directory does not exist.
    #[error("template directory not found: {}", path.display())]
    DirectoryNotFound { path: PathBuf },

    /// The template has no declaration block, so nothing could ever be generated.
    #[error("template {origin} contains no declaration blocks")]
    NoDeclarations { origin: String },
}
