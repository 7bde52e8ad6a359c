//! Provisioning pipeline orchestration.
//!
//! The pipeline is a fixed sequence of stages: check the version-control
//! client, install it when missing, create a workspace, clone the
//! repository, execute its bootstrap script, and clean up. Stages run
//! strictly one after another; every stage transition and log line goes
//! through one event sink, so observers see events in the order things
//! happened.

use std::path::PathBuf;

use thiserror::Error;
use tracing::{error, info};
use url::Url;

use crate::bootstrap::{self, BootstrapError};
use crate::deps::{self, Homebrew, InstallError, PackageManager, ToolSpec};
use crate::event::{Event, EventSink, Stage};
use crate::fetch::{self, CloneError};
use crate::workspace::{Workspace, WorkspaceError};

/// A validated request to provision from a repository.
///
/// Immutable once accepted; validation happens before the pipeline starts
/// and rejection causes no side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningRequest {
  repository_url: Url,
}

/// Errors that reject raw observer input.
#[derive(Debug, Error)]
pub enum ValidationError {
  /// The input could not be parsed as an absolute URL.
  #[error("'{input}' is not a valid URL")]
  Malformed { input: String },

  /// The URL scheme is not supported.
  #[error("unsupported URL scheme '{scheme}' (must be http or https)")]
  UnsupportedScheme { scheme: String },
}

impl ProvisioningRequest {
  /// Validate raw observer input into a request.
  pub fn parse(input: &str) -> Result<Self, ValidationError> {
    let url = Url::parse(input.trim()).map_err(|_| ValidationError::Malformed {
      input: input.to_string(),
    })?;

    match url.scheme() {
      "http" | "https" => Ok(Self { repository_url: url }),
      scheme => Err(ValidationError::UnsupportedScheme {
        scheme: scheme.to_string(),
      }),
    }
  }

  /// The validated repository URL.
  pub fn url(&self) -> &str {
    self.repository_url.as_str()
  }
}

/// Most specific failure of one provisioning run.
#[derive(Debug, Error)]
pub enum ProvisionError {
  #[error(transparent)]
  Validation(#[from] ValidationError),

  #[error(transparent)]
  Install(#[from] InstallError),

  #[error(transparent)]
  Workspace(#[from] WorkspaceError),

  #[error(transparent)]
  Clone(#[from] CloneError),

  #[error(transparent)]
  Bootstrap(#[from] BootstrapError),
}

/// Terminal value of one provisioning run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineResult {
  pub success: bool,
  pub message: String,
}

/// Sequences one provisioning run and emits its event stream.
///
/// The sink and all collaborators are injected at construction; there is no
/// process-wide state. A provisioner is single-use: [`Provisioner::provision`]
/// consumes it, so a run can never be re-entered and concurrent runs never
/// share a workspace.
pub struct Provisioner<S: EventSink> {
  sink: S,
  tool: ToolSpec,
  manager: Box<dyn PackageManager>,
  shell: String,
  workspace_root: PathBuf,
}

impl<S: EventSink> Provisioner<S> {
  /// Create a provisioner with the default collaborators: git as the
  /// version-control client, Homebrew as the package manager, bash as the
  /// script shell, and the OS temp root for workspaces.
  pub fn new(sink: S) -> Self {
    Self {
      sink,
      tool: ToolSpec::git(),
      manager: Box::new(Homebrew),
      shell: "bash".to_string(),
      workspace_root: std::env::temp_dir(),
    }
  }

  /// Replace the version-control tool.
  pub fn with_tool(mut self, tool: ToolSpec) -> Self {
    self.tool = tool;
    self
  }

  /// Replace the package-manager strategy.
  pub fn with_package_manager(mut self, manager: Box<dyn PackageManager>) -> Self {
    self.manager = manager;
    self
  }

  /// Replace the shell used to run the bootstrap script.
  pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
    self.shell = shell.into();
    self
  }

  /// Replace the directory workspaces are created under.
  pub fn with_workspace_root(mut self, root: impl Into<PathBuf>) -> Self {
    self.workspace_root = root.into();
    self
  }

  /// Run the full pipeline for `url`.
  ///
  /// Invalid input is rejected before any process is spawned. The workspace
  /// is removed on every exit path past its creation; a cleanup failure is
  /// reported as a warning and never changes the outcome. The terminal
  /// [`Event::Finished`] is emitted exactly once, carrying the same message
  /// as the returned result.
  pub async fn provision(self, url: &str) -> PipelineResult {
    let request = match ProvisioningRequest::parse(url) {
      Ok(request) => request,
      Err(e) => return self.finish(Err(e.into())),
    };

    info!(url = request.url(), "provisioning started");
    self.sink.log("Starting bootstrap process...");

    if let Err(e) = self.ensure_dependency().await {
      return self.finish(Err(e));
    }

    let outcome = self.fetch_and_execute(&request).await;
    self.finish(outcome)
  }

  /// Dependency check, then staged installation when the tool is absent.
  async fn ensure_dependency(&self) -> Result<(), ProvisionError> {
    self.stage(Stage::CheckingDependency);
    self.sink.log(format!("Checking for {} installation...", self.tool.name));

    let status = deps::check_tool(&self.tool).await;
    self.sink.log(status.message.clone());
    if status.installed {
      return Ok(());
    }

    self.stage(Stage::InstallingDependency);
    deps::ensure_tool(self.manager.as_ref(), &self.tool, &self.sink).await?;
    Ok(())
  }

  /// Workspace creation, clone, bootstrap, and unconditional cleanup.
  ///
  /// The workspace is created immediately before cloning; once it exists,
  /// cleanup runs whether the clone or the script succeeded or not.
  async fn fetch_and_execute(&self, request: &ProvisioningRequest) -> Result<(), ProvisionError> {
    self.stage(Stage::FetchingRepository);
    let workspace = Workspace::create_in(&self.workspace_root)?;
    self.sink.log(format!("Temp directory: {}", workspace.path().display()));

    let result = self.clone_and_run(request, &workspace).await;

    self.stage(Stage::CleaningUp);
    workspace.cleanup(&self.sink);
    result
  }

  async fn clone_and_run(
    &self,
    request: &ProvisioningRequest,
    workspace: &Workspace,
  ) -> Result<(), ProvisionError> {
    self.sink.log(format!("Cloning repository: {}", request.url()));
    fetch::clone_repo(&self.tool.program, request.url(), workspace.path(), &self.sink).await?;
    self.sink.log("Repository cloned successfully");

    self.stage(Stage::ExecutingBootstrap);
    bootstrap::run_script(&self.shell, workspace, &self.sink).await?;
    Ok(())
  }

  fn stage(&self, stage: Stage) {
    self.sink.emit(Event::Stage { stage });
  }

  /// Emit the terminal event and produce the run's result.
  fn finish(self, outcome: Result<(), ProvisionError>) -> PipelineResult {
    let result = match outcome {
      Ok(()) => PipelineResult {
        success: true,
        message: "Bootstrap completed successfully".to_string(),
      },
      Err(e) => {
        error!(error = %e, "provisioning failed");
        PipelineResult {
          success: false,
          message: e.to_string(),
        }
      }
    };

    self.sink.emit(Event::Finished {
      success: result.success,
      message: result.message.clone(),
    });
    result
  }
}
