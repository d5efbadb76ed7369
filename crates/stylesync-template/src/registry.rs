//! Template discovery on disk.
//!
//! [`walk_template_dir`] walks a directory recursively and collects every
//! file ending in [`TEMPLATE_SUFFIX`](crate::TEMPLATE_SUFFIX), without reading
//! content. Callers load the ones they need with [`TemplateFile::load`].

use std::path::{Path, PathBuf};

use crate::error::TemplateError;
use crate::file_name::{TemplateFileName, TEMPLATE_SUFFIX};
use crate::template::CodeTemplate;

/// A template file discovered during directory walking.
///
/// For a file at `/app/templates/ios/Colors.swift-template.txt` with root
/// `/app/templates`:
///
/// ```rust,ignore
/// TemplateFile {
///     name: "ios/Colors.swift-template.txt".to_string(),
///     path: PathBuf::from("/app/templates/ios/Colors.swift-template.txt"),
///     file_name: TemplateFileName { base_name: Some("Colors"), extension: Some("swift") },
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFile {
    /// Path relative to the walked root, with `/` separators.
    pub name: String,
    /// Full filesystem path.
    pub path: PathBuf,
    /// Output metadata parsed from the file name.
    pub file_name: TemplateFileName,
}

impl TemplateFile {
    /// Reads and parses the template.
    pub fn load(&self) -> Result<CodeTemplate, TemplateError> {
        CodeTemplate::load(&self.path)
    }
}

/// Walks a template directory and collects template files.
///
/// The result is sorted by relative name so discovery order does not depend
/// on the filesystem.
///
/// # Errors
///
/// Returns [`TemplateError::DirectoryNotFound`] if `root` is not a directory,
/// and [`TemplateError::Io`] if a directory cannot be read.
pub fn walk_template_dir(root: impl AsRef<Path>) -> Result<Vec<TemplateFile>, TemplateError> {
    let root = root.as_ref();
    if !root.is_dir() {
        return Err(TemplateError::DirectoryNotFound {
            path: root.to_path_buf(),
        });
    }

    let mut files = Vec::new();
    walk_dir_recursive(root, root, &mut files)?;
    files.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(files)
}

fn walk_dir_recursive(
    current: &Path,
    root: &Path,
    files: &mut Vec<TemplateFile>,
) -> Result<(), TemplateError> {
    let entries = std::fs::read_dir(current).map_err(|source| TemplateError::Io {
        path: current.to_path_buf(),
        source,
    })?;

    for entry in entries {
        let entry = entry.map_err(|source| TemplateError::Io {
            path: current.to_path_buf(),
            source,
        })?;
        let path = entry.path();

        if path.is_dir() {
            walk_dir_recursive(&path, root, files)?;
        } else if path.is_file() {
            if let Some(file) = try_parse_file(&path, root) {
                files.push(file);
            }
        }
    }

    Ok(())
}

/// Returns `None` for files that are not templates.
fn try_parse_file(path: &Path, root: &Path) -> Option<TemplateFile> {
    let file_name = path.file_name()?.to_string_lossy();
    if !file_name.ends_with(TEMPLATE_SUFFIX) {
        return None;
    }

    let relative = path.strip_prefix(root).ok()?;
    let name = relative
        .to_string_lossy()
        .replace(std::path::MAIN_SEPARATOR, "/");

    Some(TemplateFile {
        name,
        path: path.to_path_buf(),
        file_name: TemplateFileName::parse(&file_name),
    })
}
