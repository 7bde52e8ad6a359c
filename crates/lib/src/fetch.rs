//! Repository fetching through the version-control client.

use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::event::EventSink;
use crate::process::{self, ProcessError, RunOptions};

/// Errors that can occur while cloning.
#[derive(Debug, Error)]
pub enum CloneError {
  /// The version-control client could not be run at all.
  #[error("failed to run '{program}': {source}")]
  Process {
    program: String,
    #[source]
    source: ProcessError,
  },

  /// The clone command ran and exited with a failure (unreachable remote,
  /// invalid URL, missing authentication, unwritable destination).
  #[error("failed to clone '{url}': exit code {code:?}")]
  CloneFailed { url: String, code: Option<i32> },
}

/// Clone `url` into `dest` with the given client.
///
/// Performs a full clone; no shallow options are passed. The client's
/// progress output (git reports it on stderr) is streamed to the event log
/// unprefixed. On success `dest` contains the checked-out default branch.
pub async fn clone_repo<S: EventSink>(
  program: &str,
  url: &str,
  dest: &Path,
  sink: &S,
) -> Result<(), CloneError> {
  info!(url, dest = %dest.display(), "cloning repository");

  let dest_arg = dest.to_string_lossy();
  let outcome = process::run(
    program,
    &["clone", url, dest_arg.as_ref()],
    &RunOptions::default(),
    |_, line| sink.log(line),
  )
  .await
  .map_err(|e| CloneError::Process {
    program: program.to_string(),
    source: e,
  })?;

  if !outcome.success() {
    return Err(CloneError::CloneFailed {
      url: url.to_string(),
      code: outcome.exit_code,
    });
  }

  Ok(())
}
