//! Bootstrap script execution inside a cloned workspace.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::event::EventSink;
use crate::process::{self, OutputStream, ProcessError, RunOptions};
use crate::workspace::Workspace;

/// Script the pipeline expects at the repository root.
pub const BOOTSTRAP_SCRIPT: &str = "bootstrap.sh";

/// Prefix applied to the script's stderr lines in the event log.
const STDERR_PREFIX: &str = "ERROR: ";

const SEPARATOR: &str = "==================================================";

/// Errors that can occur while executing the bootstrap script.
#[derive(Debug, Error)]
pub enum BootstrapError {
  /// The cloned repository has no bootstrap script at its root.
  #[error("bootstrap.sh not found in repository")]
  MissingScript,

  /// The script could not be marked executable.
  #[error("failed to mark '{script}' executable: {source}")]
  Permissions {
    script: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// The script could not be started or its output could not be read.
  #[error("failed to run bootstrap.sh: {0}")]
  Process(#[from] ProcessError),

  /// The script ran and exited with a failure.
  #[error("bootstrap script exited with code {code:?}")]
  ScriptFailed { code: Option<i32> },
}

/// Locate, authorize, and run the bootstrap script.
///
/// The script is marked executable (0755) and invoked as
/// `<shell> bootstrap.sh` with the workspace as working directory. stdout is
/// streamed as-is; stderr lines are prefixed so they stand out in the event
/// log. No timeout is applied; the script may run for tens of minutes.
pub async fn run_script<S: EventSink>(
  shell: &str,
  workspace: &Workspace,
  sink: &S,
) -> Result<(), BootstrapError> {
  let script = workspace.path().join(BOOTSTRAP_SCRIPT);
  if !script.exists() {
    return Err(BootstrapError::MissingScript);
  }

  sink.log(format!("Found {BOOTSTRAP_SCRIPT}, making it executable"));
  mark_executable(&script)?;

  info!(script = %script.display(), "executing bootstrap script");
  sink.log(format!(
    "Executing {BOOTSTRAP_SCRIPT}... (no timeout is applied; this may take tens of minutes)"
  ));
  sink.log(SEPARATOR);

  let script_arg = script.to_string_lossy();
  let options = RunOptions {
    cwd: Some(workspace.path().to_path_buf()),
    envs: Vec::new(),
  };
  let outcome = process::run(shell, &[script_arg.as_ref()], &options, |stream, line| {
    match stream {
      OutputStream::Stdout => sink.log(line),
      OutputStream::Stderr => sink.log(format!("{STDERR_PREFIX}{line}")),
    }
  })
  .await?;

  sink.log(SEPARATOR);

  if !outcome.success() {
    return Err(BootstrapError::ScriptFailed {
      code: outcome.exit_code,
    });
  }

  Ok(())
}

#[cfg(unix)]
fn mark_executable(script: &Path) -> Result<(), BootstrapError> {
  use std::os::unix::fs::PermissionsExt;

  fs::set_permissions(script, fs::Permissions::from_mode(0o755)).map_err(|e| {
    BootstrapError::Permissions {
      script: script.to_path_buf(),
      source: e,
    }
  })
}

#[cfg(not(unix))]
fn mark_executable(_script: &Path) -> Result<(), BootstrapError> {
  Ok(())
}
