//! Asynchronous external command execution with live output streaming.
//!
//! Every external invocation in the pipeline goes through [`run`]. The child
//! is spawned with both pipes captured and its output is forwarded line by
//! line as it arrives; nothing is retained beyond the single line being
//! read, so arbitrarily large output never accumulates in memory.
//!
//! There is no implicit shell: callers pass explicit argument arrays. Where
//! a shell is genuinely needed, it is invoked explicitly as a program.

use std::path::PathBuf;
use std::process::Stdio;

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::debug;

/// Which pipe of a running process a line of output arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStream {
  Stdout,
  Stderr,
}

/// Exit status of a completed process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessOutcome {
  /// The exit code, or `None` when the process was terminated by a signal.
  pub exit_code: Option<i32>,
}

impl ProcessOutcome {
  pub fn success(self) -> bool {
    self.exit_code == Some(0)
  }
}

/// Options for spawning a process.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
  /// Working directory for the child; inherits the parent's when `None`.
  pub cwd: Option<PathBuf>,

  /// Environment overrides, applied on top of the inherited environment.
  pub envs: Vec<(String, String)>,
}

/// Errors that can occur while running a process.
///
/// A nonzero exit is not an error at this layer; it is reported through
/// [`ProcessOutcome`] so callers can distinguish "ran and failed" from
/// "could not start".
#[derive(Debug, Error)]
pub enum ProcessError {
  /// The command could not be started (binary not found, permission denied).
  #[error("failed to start '{program}': {source}")]
  Spawn {
    program: String,
    #[source]
    source: std::io::Error,
  },

  /// Reading from the child's stdout or stderr failed.
  #[error("failed to read output of '{program}': {source}")]
  Stream {
    program: String,
    #[source]
    source: std::io::Error,
  },

  /// Waiting for the child to exit failed.
  #[error("failed to await '{program}': {source}")]
  Wait {
    program: String,
    #[source]
    source: std::io::Error,
  },
}

/// Run a command, forwarding each output line as it arrives.
///
/// Lines are tagged with the pipe they arrived on so callers may render
/// stderr distinctly. Lines from the two pipes are forwarded in arrival
/// order; stdout and stderr of the same process may interleave. The call
/// resolves once the child has exited and both pipes are drained.
///
/// # Arguments
///
/// * `program` - Executable to invoke (resolved via PATH)
/// * `args` - Explicit argument array; never joined through a shell
/// * `options` - Working directory and environment overrides
/// * `on_line` - Called once per output line, in arrival order
pub async fn run<F>(
  program: &str,
  args: &[&str],
  options: &RunOptions,
  mut on_line: F,
) -> Result<ProcessOutcome, ProcessError>
where
  F: FnMut(OutputStream, &str),
{
  let mut command = Command::new(program);
  command
    .args(args)
    .stdin(Stdio::null())
    .stdout(Stdio::piped())
    .stderr(Stdio::piped());

  if let Some(dir) = &options.cwd {
    command.current_dir(dir);
  }
  for (key, value) in &options.envs {
    command.env(key, value);
  }

  debug!(program, ?args, "spawning process");

  let mut child = command.spawn().map_err(|e| ProcessError::Spawn {
    program: program.to_string(),
    source: e,
  })?;

  // Both pipes were configured above, so take() always yields them.
  let stdout = child.stdout.take().expect("child stdout is piped");
  let stderr = child.stderr.take().expect("child stderr is piped");

  let mut out_lines = BufReader::new(stdout).lines();
  let mut err_lines = BufReader::new(stderr).lines();
  let mut out_done = false;
  let mut err_done = false;

  while !(out_done && err_done) {
    tokio::select! {
      line = out_lines.next_line(), if !out_done => match line {
        Ok(Some(text)) => on_line(OutputStream::Stdout, &text),
        Ok(None) => out_done = true,
        Err(e) => {
          return Err(ProcessError::Stream { program: program.to_string(), source: e });
        }
      },
      line = err_lines.next_line(), if !err_done => match line {
        Ok(Some(text)) => on_line(OutputStream::Stderr, &text),
        Ok(None) => err_done = true,
        Err(e) => {
          return Err(ProcessError::Stream { program: program.to_string(), source: e });
        }
      },
    }
  }

  let status = child.wait().await.map_err(|e| ProcessError::Wait {
    program: program.to_string(),
    source: e,
  })?;

  debug!(program, code = ?status.code(), "process exited");

  Ok(ProcessOutcome {
    exit_code: status.code(),
  })
}
