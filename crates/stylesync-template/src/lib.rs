//! # Stylesync Template - Declaration-Block Code Templates
//!
//! `stylesync-template` renders source files from plain-text templates that
//! contain *declaration blocks*. Each block is repeated once per item bound to
//! it, with `{{ attribute }}` placeholders filled from the item's replacement
//! dictionary.
//!
//! ## Syntax
//!
//! ```text
//! // Generated style set {{ version }}
//! extension UIColor {
//! <color>
//!     @available(*, deprecated, message: "No longer in the design file") {% deprecated=true %}
//!     static let {{ variableName }} = UIColor(hex: "{{ hex }}")
//! </color>
//! }
//! ```
//!
//! - `<name>` / `</name>` on their own lines delimit a declaration block.
//!   Items rendered from the same block are separated by a blank line, unless
//!   the block is opened as `<name compact>`.
//! - `{{ key }}` is replaced by the item's value for `key`. Unknown keys are
//!   left untouched, so rendering never fails.
//! - A line carrying `{% deprecated=true %}` is only kept for deprecated
//!   items (and `{% deprecated=false %}` only for the others). The marker
//!   itself is removed from the output.
//! - Text outside blocks is emitted once; its placeholders resolve against the
//!   global values passed to [`CodeTemplate::generated_code`].
//!
//! Tag pairs that wrap other declaration blocks (for example `<resources>` in
//! an Android color file) are treated as literal text, as are tags with no
//! matching partner.
//!
//! ## Example
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use stylesync_template::{CodeTemplate, Replacement};
//!
//! let template = CodeTemplate::parse("<color compact>\nlet {{ variableName }} = \"{{ hex }}\"\n</color>\n").unwrap();
//!
//! let red = Replacement::new("color")
//!     .with("variableName", "red")
//!     .with("hex", "#FF0000");
//!
//! let code = template.generated_code(&[vec![red]], &BTreeMap::new());
//! assert_eq!(code, "let red = \"#FF0000\"\n");
//! ```
//!
//! ## File Name Metadata
//!
//! Template files are named `<baseName>.<extension>-template.txt`; see
//! [`TemplateFileName`].

mod error;
mod file_name;
mod parse;
mod registry;
mod replaceable;
mod substitute;
mod template;

pub use error::TemplateError;
pub use file_name::{TemplateFileName, TEMPLATE_SUFFIX};
pub use registry::{walk_template_dir, TemplateFile};
pub use replaceable::{Replaceable, Replacement};
pub use substitute::substitute;
pub use template::CodeTemplate;
