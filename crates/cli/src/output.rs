//! CLI output formatting utilities.
//!
//! Renders the pipeline's event stream to the terminal: colored stage
//! markers and status lines in text mode, one JSON object per line in JSON
//! mode.

use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};

use rigup_lib::event::Event;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const ERROR: &str = "✗";
  pub const WARNING: &str = "⚠";
  pub const INFO: &str = "•";
}

/// Render one pipeline event.
///
/// In text mode stage transitions get a `::` marker and log lines pass
/// through verbatim; the terminal event is rendered by the command itself.
/// In JSON mode every event is one serialized object per line.
pub fn render_event(event: &Event, format: OutputFormat) {
  if format.is_json() {
    if let Ok(line) = serde_json::to_string(event) {
      println!("{}", line);
    }
    return;
  }

  match event {
    Event::Stage { stage } => print_stage(stage.describe()),
    Event::Log { text } => println!("{}", text),
    Event::Finished { .. } => {}
  }
}

fn print_stage(message: &str) {
  println!(
    "{} {}",
    "::".if_supports_color(Stream::Stdout, |s| s.cyan()),
    message
  );
}

pub fn print_success(message: &str) {
  println!(
    "{} {}",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    message
  );
}

pub fn print_error(message: &str) {
  eprintln!(
    "{} {}",
    symbols::ERROR.if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}

pub fn print_warning(message: &str) {
  eprintln!(
    "{} {}",
    symbols::WARNING.if_supports_color(Stream::Stderr, |s| s.yellow()),
    message.if_supports_color(Stream::Stderr, |s| s.yellow())
  );
}

pub fn print_info(message: &str) {
  println!(
    "{} {}",
    symbols::INFO.if_supports_color(Stream::Stdout, |s| s.blue()),
    message
  );
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value)?;
  println!("{}", json);
  Ok(())
}
