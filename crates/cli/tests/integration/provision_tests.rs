//! Provision command integration tests.
//!
//! These drive the real binary with stub `git`/`brew` executables on PATH;
//! nothing touches the network.

use predicates::prelude::*;

use super::common::TestEnv;
#[cfg(unix)]
use super::common::stub_git_with_bootstrap;

#[test]
fn rejects_invalid_url_without_creating_anything() {
  let env = TestEnv::new();

  env
    .rigup_cmd()
    .args(["provision", "not-a-url"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("not a valid URL"));

  assert!(env.leftover_workspaces().is_empty());
}

#[test]
fn rejects_non_http_scheme() {
  let env = TestEnv::new();

  env
    .rigup_cmd()
    .args(["provision", "ftp://example.com/dotfiles.git"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("must be http or https"));

  assert!(env.leftover_workspaces().is_empty());
}

#[test]
#[cfg(unix)]
fn runs_bootstrap_and_cleans_up() {
  let env = TestEnv::new();
  stub_git_with_bootstrap(&env, "echo hello-from-bootstrap\nexit 0");

  env
    .rigup_cmd()
    .args(["provision", "https://example.com/dotfiles.git"])
    .assert()
    .success()
    .stdout(predicate::str::contains("hello-from-bootstrap"))
    .stdout(predicate::str::contains("Bootstrap completed successfully"));

  assert!(env.leftover_workspaces().is_empty());
}

#[test]
#[cfg(unix)]
fn missing_bootstrap_script_fails_and_cleans_up() {
  let env = TestEnv::new();
  // Clone succeeds but the repository has no bootstrap.sh.
  env.write_stub(
    "git",
    r#"if [ "$1" = "--version" ]; then exit 0; fi
if [ "$1" = "clone" ]; then mkdir -p "$3"; exit 0; fi
exit 1"#,
  );

  env
    .rigup_cmd()
    .args(["provision", "https://example.com/dotfiles.git"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("bootstrap.sh not found"));

  assert!(env.leftover_workspaces().is_empty());
}

#[test]
#[cfg(unix)]
fn script_exit_code_is_surfaced() {
  let env = TestEnv::new();
  stub_git_with_bootstrap(&env, "exit 3");

  env
    .rigup_cmd()
    .args(["provision", "https://example.com/dotfiles.git"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("exited with code"));

  assert!(env.leftover_workspaces().is_empty());
}

#[test]
#[cfg(unix)]
fn script_stderr_is_prefixed_in_the_log() {
  let env = TestEnv::new();
  stub_git_with_bootstrap(&env, "echo boom >&2\nexit 0");

  env
    .rigup_cmd()
    .args(["provision", "https://example.com/dotfiles.git"])
    .assert()
    .success()
    .stdout(predicate::str::contains("ERROR: boom"));
}

#[test]
#[cfg(unix)]
fn absent_git_is_installed_through_the_package_manager() {
  let env = TestEnv::new();
  // git fails its version check but can clone; the stub brew reports itself
  // present and "installs" successfully, so no bootstrap installer runs.
  env.write_stub(
    "git",
    r#"if [ "$1" = "--version" ]; then exit 1; fi
if [ "$1" = "clone" ]; then
  mkdir -p "$3"
  printf '#!/bin/sh\nexit 0\n' > "$3/bootstrap.sh"
  exit 0
fi
exit 1"#,
  );
  env.write_stub("brew", "echo \"==> brew $*\"\nexit 0");

  env
    .rigup_cmd()
    .args(["provision", "https://example.com/dotfiles.git"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Installing Git via Homebrew"))
    .stdout(predicate::str::contains("Bootstrap completed successfully"));

  assert!(env.leftover_workspaces().is_empty());
}

#[test]
#[cfg(unix)]
fn json_output_emits_typed_events() {
  let env = TestEnv::new();
  stub_git_with_bootstrap(&env, "exit 0");

  env
    .rigup_cmd()
    .args(["provision", "https://example.com/dotfiles.git", "--output", "json"])
    .assert()
    .success()
    .stdout(predicate::str::contains(r#""type":"stage""#))
    .stdout(predicate::str::contains(r#""stage":"checking_dependency""#))
    .stdout(predicate::str::contains(r#""type":"finished""#));
}
