//! Test helpers shared across the crate's unit tests.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::event::{Event, EventSink};

/// An [`EventSink`] that records every event for later inspection.
#[derive(Debug, Clone, Default)]
pub struct CollectSink {
  events: Arc<Mutex<Vec<Event>>>,
}

impl CollectSink {
  pub fn new() -> Self {
    Self::default()
  }

  /// All events emitted so far, in emission order.
  pub fn events(&self) -> Vec<Event> {
    self.events.lock().unwrap().clone()
  }

  /// Only the free-text log lines, in emission order.
  pub fn log_lines(&self) -> Vec<String> {
    self
      .events()
      .into_iter()
      .filter_map(|event| match event {
        Event::Log { text } => Some(text),
        _ => None,
      })
      .collect()
  }
}

impl EventSink for CollectSink {
  fn emit(&self, event: Event) {
    self.events.lock().unwrap().push(event);
  }
}

/// Write an executable `/bin/sh` script and return its path.
#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
  use std::os::unix::fs::PermissionsExt;

  let path = dir.join(name);
  std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
  std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
  path
}
