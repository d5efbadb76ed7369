//! Output metadata encoded in template file names.
//!
//! A template named `Colors.swift-template.txt` generates `Colors.swift`.
//! Both parts are optional:
//!
//! | File name | Base name | Extension |
//! |-----------|-----------|-----------|
//! | `Colors.swift-template.txt` | `Colors` | `swift` |
//! | `swift-template.txt` | - | `swift` |
//! | `.swift-template.txt` | - | `swift` |
//! | `Colors.-template.txt` | `Colors` | - |
//! | `template.txt` | - | - |
//!
//! Missing parts fall back to caller-supplied defaults.

/// Suffix every template file name carries.
pub const TEMPLATE_SUFFIX: &str = "-template.txt";

/// Base name and extension parsed from a template's file name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateFileName {
    pub base_name: Option<String>,
    pub extension: Option<String>,
}

impl TemplateFileName {
    /// Parses the metadata out of a file name (not a full path).
    ///
    /// Names without the [`TEMPLATE_SUFFIX`] carry no metadata.
    pub fn parse(file_name: &str) -> Self {
        let Some(stem) = file_name.strip_suffix(TEMPLATE_SUFFIX) else {
            return Self::default();
        };

        match stem.rsplit_once('.') {
            Some((base, extension)) => Self {
                base_name: non_empty(base),
                extension: non_empty(extension),
            },
            None => Self {
                base_name: None,
                extension: non_empty(stem),
            },
        }
    }

    /// The output base name, or `default` when the template name has none.
    pub fn base_name_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.base_name.as_deref().unwrap_or(default)
    }

    /// The output extension, or `default` when the template name has none.
    pub fn extension_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.extension.as_deref().unwrap_or(default)
    }

    /// Full output file name, e.g. `Colors.swift`.
    pub fn output_file_name(&self, default_base: &str, default_extension: &str) -> String {
        format!(
            "{}.{}",
            self.base_name_or(default_base),
            self.extension_or(default_extension)
        )
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}
