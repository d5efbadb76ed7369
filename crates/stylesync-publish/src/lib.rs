//! Publishing exported style files.
//!
//! [`GitPublisher`] stages the files an export produced and commits them as
//! one commit named after the new version. Commands block until they exit;
//! a timeout is optional and unset by default.
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//! use stylesync_publish::{GitPublisher, Publisher};
//!
//! let files = vec![PathBuf::from("Colors.swift"), PathBuf::from(".stylesync/color-styles.json")];
//! GitPublisher::new(".").publish(&files, "1.3")?;
//! # Ok::<(), stylesync_publish::PublishError>(())
//! ```

pub mod git;
pub mod shell;

pub use git::{commit_message, GitPublisher, PublishError, Publisher};
pub use shell::{CommandOutput, CommandRunner, ShellError};
