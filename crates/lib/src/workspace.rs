//! Temporary workspace lifecycle.
//!
//! Each provisioning run clones into a fresh, uniquely named directory under
//! the system temp root. Exactly one workspace exists per run; it is removed
//! on every exit path, and a removal failure is reported as a warning, never
//! as a pipeline failure.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use thiserror::Error;
use tracing::{debug, warn};

use crate::event::EventSink;

/// Prefix of every workspace directory name.
const WORKSPACE_PREFIX: &str = "rigup-";

/// Errors that can occur while allocating a workspace.
#[derive(Debug, Error)]
pub enum WorkspaceError {
  #[error("failed to create workspace directory under '{base}': {source}")]
  Create {
    base: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

/// A temporary directory owned by one provisioning run.
#[derive(Debug)]
pub struct Workspace {
  path: PathBuf,
  created_at: SystemTime,
}

impl Workspace {
  /// Allocate a fresh workspace under the system temp root.
  pub fn create() -> Result<Self, WorkspaceError> {
    Self::create_in(&std::env::temp_dir())
  }

  /// Allocate a fresh workspace under the given base directory.
  ///
  /// The directory name is a fixed prefix plus a random suffix, so
  /// concurrent runs cannot collide.
  pub fn create_in(base: &Path) -> Result<Self, WorkspaceError> {
    let dir = tempfile::Builder::new()
      .prefix(WORKSPACE_PREFIX)
      .tempdir_in(base)
      .map_err(|e| WorkspaceError::Create {
        base: base.to_path_buf(),
        source: e,
      })?;

    // Removal is owned by cleanup(), not by an implicit drop.
    let path = dir.keep();
    debug!(path = %path.display(), "created workspace");

    Ok(Self {
      path,
      created_at: SystemTime::now(),
    })
  }

  /// Path to the workspace root. Only surfaced outside the crate as log text.
  pub(crate) fn path(&self) -> &Path {
    &self.path
  }

  /// Recursively remove the workspace tree.
  ///
  /// A removal failure is reported as a warning event; the run's outcome is
  /// determined by the bootstrap script, never by cleanup.
  pub fn cleanup<S: EventSink>(self, sink: &S) {
    let lived = self.created_at.elapsed().unwrap_or_default();

    match fs::remove_dir_all(&self.path) {
      Ok(()) => {
        debug!(path = %self.path.display(), ?lived, "removed workspace");
        sink.log("Cleaned up temporary files");
      }
      Err(error) => {
        warn!(path = %self.path.display(), %error, "failed to remove workspace");
        sink.log(format!("Warning: Could not clean up {}", self.path.display()));
      }
    }
  }
}
