//! Progress and log events emitted by the provisioning pipeline.
//!
//! The pipeline is the sole writer to the event stream; stages run strictly
//! one after another, so emission order is the order things happened. There
//! is no backpressure: sinks must not block, and an observer that has gone
//! away simply stops receiving events.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;

/// One sequential step of the provisioning pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
  CheckingDependency,
  InstallingDependency,
  FetchingRepository,
  ExecutingBootstrap,
  CleaningUp,
}

impl Stage {
  /// Human-readable description, suitable for progress display.
  pub fn describe(self) -> &'static str {
    match self {
      Stage::CheckingDependency => "Checking for required tooling",
      Stage::InstallingDependency => "Installing missing tooling",
      Stage::FetchingRepository => "Fetching repository",
      Stage::ExecutingBootstrap => "Executing bootstrap script",
      Stage::CleaningUp => "Cleaning up",
    }
  }
}

/// A single event on the observer channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
  /// The pipeline entered a new stage.
  Stage { stage: Stage },

  /// One line of log output, from the pipeline itself or from an
  /// underlying process.
  Log { text: String },

  /// Terminal event, emitted exactly once per run.
  Finished { success: bool, message: String },
}

/// Receives events from the provisioning pipeline.
///
/// Implementations must not block; `emit` is called from the pipeline's
/// control flow between process reads.
pub trait EventSink: Send + Sync {
  fn emit(&self, event: Event);

  /// Emit a free-text log line.
  fn log(&self, text: impl Into<String>)
  where
    Self: Sized,
  {
    self.emit(Event::Log { text: text.into() });
  }
}

/// Channel-backed sink. A dropped receiver means the observer has gone
/// away; events are then discarded rather than treated as an error.
impl EventSink for UnboundedSender<Event> {
  fn emit(&self, event: Event) {
    let _ = self.send(event);
  }
}
