//! Shared test helpers for CLI integration tests.
//!
//! Each test gets its own temporary directory holding a stub-binary dir
//! (prepended to PATH, so `git` and `brew` resolve to test stubs) and a
//! private temp root (TMPDIR, so workspace creation and removal are
//! observable).

use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Isolated test environment.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  pub fn new() -> Self {
    let temp = TempDir::new().unwrap();
    std::fs::create_dir_all(temp.path().join("bin")).unwrap();
    std::fs::create_dir_all(temp.path().join("tmp")).unwrap();
    Self { temp }
  }

  /// Directory stub executables are placed in.
  pub fn bin_dir(&self) -> PathBuf {
    self.temp.path().join("bin")
  }

  /// Private temp root the pipeline creates workspaces under.
  pub fn tmp_dir(&self) -> PathBuf {
    self.temp.path().join("tmp")
  }

  /// Write an executable stub into the bin dir.
  #[cfg(unix)]
  pub fn write_stub(&self, name: &str, body: &str) {
    use std::os::unix::fs::PermissionsExt;

    let path = self.bin_dir().join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
  }

  /// Workspace directories left behind under the private temp root.
  pub fn leftover_workspaces(&self) -> Vec<PathBuf> {
    std::fs::read_dir(self.tmp_dir())
      .unwrap()
      .filter_map(|entry| {
        let path = entry.unwrap().path();
        let name = path.file_name()?.to_string_lossy().to_string();
        name.starts_with("rigup-").then_some(path)
      })
      .collect()
  }

  /// Get a pre-configured Command for the rigup binary.
  pub fn rigup_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("rigup");
    let path = std::env::var("PATH").unwrap_or_default();
    cmd.env("PATH", format!("{}:{}", self.bin_dir().display(), path));
    cmd.env("TMPDIR", self.tmp_dir());
    cmd
  }
}

/// Install a stub `git` that answers `--version` and clones a repository
/// whose bootstrap script has the given body.
#[cfg(unix)]
pub fn stub_git_with_bootstrap(env: &TestEnv, script_body: &str) {
  let body = format!(
    r#"if [ "$1" = "--version" ]; then echo "git version 2.44.0"; exit 0; fi
if [ "$1" = "clone" ]; then
  mkdir -p "$3"
  cat > "$3/bootstrap.sh" <<'EOS'
#!/bin/sh
{script_body}
EOS
  exit 0
fi
exit 1"#
  );
  env.write_stub("git", &body);
}
