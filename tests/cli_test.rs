#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::wildcard_imports,
    clippy::indexing_slicing
)]
//! End-to-end tests of the `provision` binary.
//!
//! Every run gets its own temporary home, cache and working directory so the
//! binary never reads or writes the real user's files. Only filesystem-backed
//! sections are configured, so no external program is executed.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const CONFIG_LINE: &str = r#"
[[config_lines]]
path = "~/.config/fish/config.fish"
line = "set -gx EDITOR nvim"
"#;

fn provision(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("provision").unwrap();
    cmd.current_dir(home)
        .env("HOME", home)
        .env("XDG_CACHE_HOME", home.join(".cache"))
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("PROVISION_CONFIG");
    cmd
}

fn home_with_config(toml: &str) -> TempDir {
    let home = tempfile::tempdir().unwrap();
    fs::write(home.path().join("provision.toml"), toml).unwrap();
    home
}

#[test]
fn help_exits_zero() {
    let home = tempfile::tempdir().unwrap();
    provision(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--dry-run"))
        .stdout(predicate::str::contains("--only"));
}

#[test]
fn version_exits_zero() {
    let home = tempfile::tempdir().unwrap();
    provision(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("provision "));
}

#[test]
fn unknown_flag_is_named_in_error() {
    let home = tempfile::tempdir().unwrap();
    provision(home.path())
        .arg("--frobnicate")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--frobnicate"));
}

#[test]
fn dry_run_marks_output_and_changes_nothing() {
    let home = home_with_config(CONFIG_LINE);
    provision(home.path())
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("[DRY-RUN]"))
        .stdout(predicate::str::contains("would apply"));
    assert!(!home.path().join(".config/fish/config.fish").exists());
}

#[test]
fn run_applies_then_skips() {
    let home = home_with_config(CONFIG_LINE);
    let target = home.path().join(".config/fish/config.fish");

    provision(home.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("applied"))
        .stdout(predicate::str::contains("[DRY-RUN]").not());
    assert_eq!(fs::read_to_string(&target).unwrap(), "set -gx EDITOR nvim\n");

    provision(home.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("already satisfied, skipped"));
    assert_eq!(fs::read_to_string(&target).unwrap(), "set -gx EDITOR nvim\n");
}

#[test]
fn writes_log_file_under_cache_dir() {
    let home = home_with_config(CONFIG_LINE);
    provision(home.path()).arg("-d").assert().success();
    let log = fs::read_to_string(home.path().join(".cache/provision/provision.log")).unwrap();
    assert!(log.contains("(dry run)"));
    assert!(log.contains("run start: 1 steps"));
}

#[test]
fn explicit_config_path_is_used() {
    let home = tempfile::tempdir().unwrap();
    let path = home.path().join("custom.toml");
    fs::write(&path, CONFIG_LINE).unwrap();
    provision(home.path())
        .arg("--config")
        .arg(&path)
        .assert()
        .success();
    assert!(home.path().join(".config/fish/config.fish").exists());
}

#[test]
fn missing_config_fails() {
    let home = tempfile::tempdir().unwrap();
    provision(home.path())
        .args(["-c", "does-not-exist.toml"])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("no configuration file found"));
}

#[test]
fn invalid_config_fails() {
    let home = home_with_config("[pakages]\nformulae = [\"git\"]\n");
    provision(home.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Invalid config"));
}

#[test]
fn filters_that_leave_nothing_fail() {
    let home = home_with_config(CONFIG_LINE);
    provision(home.path())
        .args(["--only", "nothing-matches"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("No steps to run"));
}

#[test]
fn non_fatal_failure_keeps_exit_zero() {
    let home = home_with_config(
        r#"
[[config_lines]]
path = "~/not-a-file"
line = "x"
"#,
    );
    fs::create_dir(home.path().join("not-a-file")).unwrap();
    provision(home.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("failed (non-fatal)"));
}

#[test]
fn fatal_failure_exits_non_zero() {
    let home = home_with_config(
        r#"
[shell]
path = "/nonexistent/bin/fish"
shells_file = "~/shells"
"#,
    );
    fs::write(home.path().join("shells"), "/bin/sh\n").unwrap();
    provision(home.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("aborted at step 1/2"))
        .stdout(predicate::str::contains("shell binary not found"));
}
