use std::ffi::OsStr;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::Duration;
use thiserror::Error;
use wait_timeout::ChildExt;

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("command `{0}` timed out after {1:?}")]
    Timeout(String, Duration),
    #[error("command `{command}` failed with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: ExitStatus,
        stderr: String,
    },
    #[error("command output was not valid UTF-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

/// What a finished command printed, and how it exited.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

/// Runs programs in a fixed directory, blocking until they exit.
///
/// Programs are started directly, not through a shell, so arguments such as
/// file paths need no quoting.
#[derive(Debug, Clone)]
pub struct CommandRunner {
    dir: PathBuf,
    timeout: Option<Duration>,
}

impl CommandRunner {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            timeout: None,
        }
    }

    /// Kill commands that run longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Runs a command and returns its output whatever the exit status.
    ///
    /// Both pipes are drained while the command runs, so commands may print
    /// more than a pipe buffer holds.
    pub fn output<S: AsRef<OsStr>>(
        &self,
        program: &str,
        args: &[S],
    ) -> Result<CommandOutput, ShellError> {
        let command = describe(program, args);
        let mut child = Command::new(program)
            .args(args)
            .current_dir(&self.dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let (status, stdout, stderr) = match self.timeout {
            None => {
                let output = child.wait_with_output()?;
                (output.status, output.stdout, output.stderr)
            }
            Some(duration) => {
                let stdout = drain(child.stdout.take());
                let stderr = drain(child.stderr.take());
                let status = match child.wait_timeout(duration)? {
                    Some(status) => status,
                    None => {
                        child.kill()?;
                        child.wait()?;
                        return Err(ShellError::Timeout(command, duration));
                    }
                };
                (status, gather(stdout)?, gather(stderr)?)
            }
        };

        tracing::debug!(%command, %status, "command finished");
        Ok(CommandOutput {
            status,
            stdout: String::from_utf8(stdout)?,
            stderr: String::from_utf8_lossy(&stderr).trim().to_string(),
        })
    }

    /// Runs a command and fails unless it exits successfully.
    ///
    /// Returns the command's stdout.
    pub fn run<S: AsRef<OsStr>>(&self, program: &str, args: &[S]) -> Result<String, ShellError> {
        let output = self.output(program, args)?;
        if !output.status.success() {
            return Err(ShellError::CommandFailed {
                command: describe(program, args),
                status: output.status,
                stderr: output.stderr,
            });
        }
        Ok(output.stdout)
    }
}

type Drain = thread::JoinHandle<io::Result<Vec<u8>>>;

/// Reads a pipe to its end on a separate thread.
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<Drain> {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            pipe.read_to_end(&mut buf)?;
            Ok(buf)
        })
    })
}

fn gather(drain: Option<Drain>) -> Result<Vec<u8>, ShellError> {
    match drain {
        Some(handle) => handle
            .join()
            .unwrap_or_else(|_| Err(io::Error::new(io::ErrorKind::Other, "pipe reader panicked")))
            .map_err(ShellError::from),
        None => Ok(Vec::new()),
    }
}

fn describe<S: AsRef<OsStr>>(program: &str, args: &[S]) -> String {
    std::iter::once(program.to_string())
        .chain(args.iter().map(|a| a.as_ref().to_string_lossy().into_owned()))
        .collect::<Vec<_>>()
        .join(" ")
}
