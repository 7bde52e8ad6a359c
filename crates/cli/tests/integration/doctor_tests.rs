//! Doctor command integration tests.

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
#[cfg(unix)]
fn reports_present_tooling() {
  let env = TestEnv::new();
  env.write_stub("git", "exit 0");
  env.write_stub("brew", "exit 0");

  env
    .rigup_cmd()
    .arg("doctor")
    .assert()
    .success()
    .stdout(predicate::str::contains("Git is installed"))
    .stdout(predicate::str::contains("Homebrew is installed"));
}

#[test]
#[cfg(unix)]
fn reports_missing_tooling_but_exits_zero() {
  let env = TestEnv::new();
  let mut cmd = env.rigup_cmd();
  // Restrict PATH to the (empty) stub dir so neither git nor brew resolve.
  cmd.env("PATH", env.bin_dir());

  cmd
    .arg("doctor")
    .assert()
    .success()
    .stderr(predicate::str::contains("Git not found"))
    .stderr(predicate::str::contains("Homebrew not found"));
}

#[test]
#[cfg(unix)]
fn json_output_reports_both_tools() {
  let env = TestEnv::new();
  env.write_stub("git", "exit 0");
  env.write_stub("brew", "exit 0");

  env
    .rigup_cmd()
    .args(["doctor", "--output", "json"])
    .assert()
    .success()
    .stdout(predicate::str::contains("\"package_manager\""))
    .stdout(predicate::str::contains("\"installed\": true"));
}
