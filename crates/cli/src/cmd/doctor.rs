//! Implementation of the `rigup doctor` command.
//!
//! Reports whether the version-control client and the platform package
//! manager are present. Informational only; always exits 0 — `provision`
//! installs missing tooling itself.

use anyhow::Result;

use rigup_lib::deps::{self, DependencyStatus, Homebrew, PackageManager, ToolSpec};

use crate::output::{self, OutputFormat};

/// Execute the doctor command.
pub async fn cmd_doctor(format: OutputFormat) -> Result<()> {
  let git = deps::check_tool(&ToolSpec::git()).await;

  let manager = Homebrew;
  let probe = manager.probe();
  let manager_status = deps::check_tool(&ToolSpec {
    name: manager.name().to_string(),
    program: probe.program,
    version_args: probe.args,
  })
  .await;

  if format.is_json() {
    output::print_json(&serde_json::json!({
      "git": status_json(&git),
      "package_manager": status_json(&manager_status),
    }))?;
    return Ok(());
  }

  for status in [&git, &manager_status] {
    if status.installed {
      output::print_success(&status.message);
    } else {
      output::print_warning(&status.message);
    }
  }

  if !git.installed {
    output::print_info("`rigup provision <url>` installs missing tooling automatically");
  }

  Ok(())
}

fn status_json(status: &DependencyStatus) -> serde_json::Value {
  serde_json::json!({
    "installed": status.installed,
    "message": status.message,
  })
}
