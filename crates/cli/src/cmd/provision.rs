//! Implementation of the `rigup provision` command.
//!
//! Wires a channel-backed event sink to terminal rendering, runs the
//! pipeline to completion, and exits nonzero when provisioning fails.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::debug;

use rigup_lib::event::Event;
use rigup_lib::pipeline::Provisioner;

use crate::output::{self, OutputFormat};

/// Execute the provision command.
pub async fn cmd_provision(url: &str, format: OutputFormat) -> Result<()> {
  let started = Instant::now();

  let (tx, mut rx) = mpsc::unbounded_channel::<Event>();
  let printer = tokio::spawn(async move {
    while let Some(event) = rx.recv().await {
      output::render_event(&event, format);
    }
  });

  let result = Provisioner::new(tx).provision(url).await;

  // The provisioner owned the sender; once it returns, the channel closes
  // and the printer drains whatever is left.
  printer.await.context("event printer task failed")?;

  let elapsed = Duration::from_secs(started.elapsed().as_secs());
  debug!(?elapsed, success = result.success, "provisioning finished");

  if !result.success {
    if !format.is_json() {
      output::print_error(&result.message);
    }
    std::process::exit(1);
  }

  if !format.is_json() {
    output::print_success(&format!(
      "{} in {}",
      result.message,
      humantime::format_duration(elapsed)
    ));
  }

  Ok(())
}
