use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info};

use crate::shell::{CommandRunner, ShellError};

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("{} is not inside a git work tree", path.display())]
    NotARepository { path: PathBuf },

    #[error("git failed: {0}")]
    Shell(#[from] ShellError),
}

/// Somewhere exported files can be handed off to.
pub trait Publisher {
    /// Publishes `files` as the style set `version`.
    fn publish(&self, files: &[PathBuf], version: &str) -> Result<(), PublishError>;
}

/// Commit message for an exported version.
pub fn commit_message(version: &str) -> String {
    format!("Update styles to {}", version)
}

/// Stages the files and commits them in one commit.
///
/// When the files carry no change, nothing is committed.
#[derive(Debug, Clone)]
pub struct GitPublisher {
    runner: CommandRunner,
}

impl GitPublisher {
    pub fn new(repository: impl Into<PathBuf>) -> Self {
        Self {
            runner: CommandRunner::new(repository),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.runner = self.runner.with_timeout(timeout);
        self
    }

    pub fn repository(&self) -> &Path {
        self.runner.dir()
    }

    fn ensure_repository(&self) -> Result<(), PublishError> {
        let output = self
            .runner
            .output("git", &["rev-parse", "--is-inside-work-tree"])?;
        if output.status.success() && output.stdout.trim() == "true" {
            Ok(())
        } else {
            Err(PublishError::NotARepository {
                path: self.repository().to_path_buf(),
            })
        }
    }

    fn has_staged_changes(&self) -> Result<bool, PublishError> {
        let output = self
            .runner
            .output("git", &["diff", "--cached", "--quiet"])?;
        Ok(!output.status.success())
    }
}

impl Publisher for GitPublisher {
    fn publish(&self, files: &[PathBuf], version: &str) -> Result<(), PublishError> {
        if files.is_empty() {
            debug!("no files to publish");
            return Ok(());
        }
        self.ensure_repository()?;

        let mut add = vec![OsStr::new("add"), OsStr::new("--")];
        add.extend(files.iter().map(|f| f.as_os_str()));
        self.runner.run("git", &add)?;

        if !self.has_staged_changes()? {
            info!(version, "nothing to commit");
            return Ok(());
        }

        let message = commit_message(version);
        self.runner.run("git", &["commit", "-m", message.as_str()])?;
        info!(version, files = files.len(), "committed exported styles");
        Ok(())
    }
}
