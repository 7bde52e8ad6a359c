//! Tool detection and staged installation.
//!
//! Detection runs the tool's version command; absence is a reportable status,
//! not an error. Installation is a two-phase chain through a pluggable
//! package-manager strategy: bootstrap the manager itself when missing, then
//! install the tool through it.

use thiserror::Error;
use tracing::{debug, info};

use crate::event::EventSink;
use crate::process::{self, ProcessError, ProcessOutcome, RunOptions};

/// An external tool the pipeline depends on.
#[derive(Debug, Clone)]
pub struct ToolSpec {
  /// Display name used in status and log messages.
  pub name: String,

  /// Executable to invoke; also the package name handed to the manager.
  pub program: String,

  /// Arguments that make the tool print its version and exit 0.
  pub version_args: Vec<String>,
}

impl ToolSpec {
  /// The version-control client the pipeline needs for cloning.
  pub fn git() -> Self {
    Self {
      name: "Git".to_string(),
      program: "git".to_string(),
      version_args: vec!["--version".to_string()],
    }
  }
}

/// Outcome of a tool presence check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyStatus {
  pub installed: bool,
  pub message: String,
}

/// Check whether a tool is present by running its version command.
///
/// Both a spawn failure (binary missing) and a nonzero exit map to
/// `installed: false`; stderr warnings from a zero exit do not. This
/// function never fails: "not installed" is a status.
pub async fn check_tool(tool: &ToolSpec) -> DependencyStatus {
  let args: Vec<&str> = tool.version_args.iter().map(String::as_str).collect();
  let result = process::run(&tool.program, &args, &RunOptions::default(), |_, _| {}).await;

  match result {
    Ok(outcome) if outcome.success() => DependencyStatus {
      installed: true,
      message: format!("{} is installed", tool.name),
    },
    Ok(_) => DependencyStatus {
      installed: false,
      message: format!("{} check failed", tool.name),
    },
    Err(_) => DependencyStatus {
      installed: false,
      message: format!("{} not found", tool.name),
    },
  }
}

/// A fully specified command an installer phase runs.
#[derive(Debug, Clone)]
pub struct InstallCommand {
  pub program: String,
  pub args: Vec<String>,

  /// Environment overrides, e.g. a non-interactive flag.
  pub envs: Vec<(String, String)>,
}

/// Platform package-manager strategy used to install missing tools.
///
/// Implementations describe the commands to run; [`ensure_tool`] executes
/// them and streams their output. Keeping this a trait allows per-platform
/// strategies and test substitutes.
pub trait PackageManager: Send + Sync {
  /// Display name used in log and error messages.
  fn name(&self) -> &str;

  /// Version command that exits 0 when the manager itself is present.
  fn probe(&self) -> InstallCommand;

  /// Non-interactive command that installs the manager itself.
  fn bootstrap(&self) -> InstallCommand;

  /// Command that installs the given package through the manager.
  fn install(&self, package: &str) -> InstallCommand;
}

/// Homebrew, the default strategy on macOS and Linux.
#[derive(Debug, Clone, Copy, Default)]
pub struct Homebrew;

/// Upstream installer invocation. The installer is distributed as a shell
/// script, so this is the one command expressed as a shell line; it contains
/// no user-supplied data.
const HOMEBREW_BOOTSTRAP: &str =
  "curl -fsSL https://raw.githubusercontent.com/Homebrew/install/HEAD/install.sh | /bin/bash";

impl PackageManager for Homebrew {
  fn name(&self) -> &str {
    "Homebrew"
  }

  fn probe(&self) -> InstallCommand {
    InstallCommand {
      program: "brew".to_string(),
      args: vec!["--version".to_string()],
      envs: Vec::new(),
    }
  }

  fn bootstrap(&self) -> InstallCommand {
    InstallCommand {
      program: "/bin/bash".to_string(),
      args: vec!["-c".to_string(), HOMEBREW_BOOTSTRAP.to_string()],
      envs: vec![("NONINTERACTIVE".to_string(), "1".to_string())],
    }
  }

  fn install(&self, package: &str) -> InstallCommand {
    InstallCommand {
      program: "brew".to_string(),
      args: vec!["install".to_string(), package.to_string()],
      envs: Vec::new(),
    }
  }
}

/// Errors that can occur during staged installation.
///
/// The variant identifies which phase failed; the pipeline must not proceed
/// to fetch or execute stages after any of these.
#[derive(Debug, Error)]
pub enum InstallError {
  /// The package-manager bootstrap installer could not be started.
  #[error("failed to run the {manager} bootstrap installer: {source}")]
  BootstrapSpawn {
    manager: String,
    #[source]
    source: ProcessError,
  },

  /// The package-manager bootstrap installer exited with a failure.
  #[error("{manager} bootstrap installer exited with code {code:?}")]
  BootstrapFailed { manager: String, code: Option<i32> },

  /// The tool install command could not be started.
  #[error("failed to run {manager} install for {tool}: {source}")]
  InstallSpawn {
    manager: String,
    tool: String,
    #[source]
    source: ProcessError,
  },

  /// The tool install command exited with a failure.
  #[error("{manager} install for {tool} exited with code {code:?}")]
  InstallFailed {
    manager: String,
    tool: String,
    code: Option<i32>,
  },
}

/// Install a missing tool through the package manager.
///
/// Two phases:
/// (a) probe the manager itself; when absent, run its bootstrap installer,
/// streaming all output. Skipped entirely when the probe succeeds.
/// (b) run the manager's install command for the tool, streaming output.
///
/// Any phase failure aborts the whole installation with an error naming the
/// phase.
pub async fn ensure_tool<S: EventSink>(
  manager: &dyn PackageManager,
  tool: &ToolSpec,
  sink: &S,
) -> Result<(), InstallError> {
  sink.log(format!("{} not found. Installing {}...", tool.name, tool.name));

  if probe_present(&manager.probe()).await {
    debug!(manager = manager.name(), "package manager already present");
  } else {
    sink.log(format!(
      "{} not found. Installing {} first...",
      manager.name(),
      manager.name()
    ));
    info!(manager = manager.name(), "bootstrapping package manager");

    let outcome = run_streaming(&manager.bootstrap(), sink)
      .await
      .map_err(|e| InstallError::BootstrapSpawn {
        manager: manager.name().to_string(),
        source: e,
      })?;
    if !outcome.success() {
      return Err(InstallError::BootstrapFailed {
        manager: manager.name().to_string(),
        code: outcome.exit_code,
      });
    }
  }

  sink.log(format!("Installing {} via {}...", tool.name, manager.name()));
  info!(manager = manager.name(), tool = %tool.program, "installing tool");

  let outcome = run_streaming(&manager.install(&tool.program), sink)
    .await
    .map_err(|e| InstallError::InstallSpawn {
      manager: manager.name().to_string(),
      tool: tool.name.clone(),
      source: e,
    })?;
  if !outcome.success() {
    return Err(InstallError::InstallFailed {
      manager: manager.name().to_string(),
      tool: tool.name.clone(),
      code: outcome.exit_code,
    });
  }

  sink.log(format!("{} installed successfully", tool.name));
  Ok(())
}

/// Run the manager's probe, discarding output.
async fn probe_present(probe: &InstallCommand) -> bool {
  let args: Vec<&str> = probe.args.iter().map(String::as_str).collect();
  let options = RunOptions {
    cwd: None,
    envs: probe.envs.clone(),
  };
  matches!(
    process::run(&probe.program, &args, &options, |_, _| {}).await,
    Ok(outcome) if outcome.success()
  )
}

/// Run an installer command, forwarding every output line to the sink.
async fn run_streaming<S: EventSink>(
  command: &InstallCommand,
  sink: &S,
) -> Result<ProcessOutcome, ProcessError> {
  let args: Vec<&str> = command.args.iter().map(String::as_str).collect();
  let options = RunOptions {
    cwd: None,
    envs: command.envs.clone(),
  };
  process::run(&command.program, &args, &options, |_, line| sink.log(line)).await
}
