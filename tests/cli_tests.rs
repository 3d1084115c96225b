//! Integration tests for the `flow` binary

mod common;

use assert_cmd::Command;
use common::TestRepo;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

/// `flow` rooted at `dir`, isolated from any user-level configuration
fn flow(dir: &Path, home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("flow").unwrap();
    cmd.current_dir(dir)
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env("GIT_CONFIG_NOSYSTEM", "1")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_help_default() {
    let home = TempDir::new().unwrap();
    flow(home.path(), &home)
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("Commands:"));
}

#[test]
fn test_cli_version_flag() {
    let home = TempDir::new().unwrap();
    flow(home.path(), &home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_invalid_command() {
    let home = TempDir::new().unwrap();
    flow(home.path(), &home)
        .arg("invalid-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn test_feature_start_and_finish() {
    let repo = TestRepo::new();
    let home = TempDir::new().unwrap();

    flow(repo.path(), &home)
        .args(["feature", "start", "login"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created branch 'feature/login'"));

    repo.commit_file("login.rs", "fn login() {}\n", "Add login");

    flow(repo.path(), &home)
        .args(["feature", "finish"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Auto-detected feature: login"))
        .stdout(predicate::str::contains("Feature finish complete: feature/login"));

    assert!(!repo.has_branch("feature/login"));
    assert_eq!(repo.current_branch(), "develop");
}

#[test]
fn test_invalid_name_exits_with_suggestion() {
    let repo = TestRepo::new();
    let home = TempDir::new().unwrap();

    flow(repo.path(), &home)
        .args(["feature", "start", "Bad_Name"])
        .assert()
        .code(8)
        .stderr(predicate::str::contains("Suggested: bad-name"));

    assert_eq!(repo.branches(), vec!["develop", "master"]);
}

#[test]
fn test_release_partial_success_exit_code() {
    let repo = TestRepo::new();
    let home = TempDir::new().unwrap();

    flow(repo.path(), &home)
        .args(["release", "start", "1.0.0"])
        .assert()
        .success();
    repo.commit_file("shared.txt", "release\n", "Release change");
    repo.git(&["checkout", "-q", "develop"]);
    repo.commit_file("shared.txt", "develop\n", "Develop change");

    flow(repo.path(), &home)
        .args(["release", "finish", "1.0.0"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Partial success"))
        .stderr(predicate::str::contains("✅ created tag 'v1.0.0'"))
        .stderr(predicate::str::contains("To finish by hand:"))
        .stderr(predicate::str::contains("git merge --no-ff release/1.0.0"));
}

#[test]
fn test_status_outside_repository() {
    let dir = TempDir::new().unwrap();
    let home = TempDir::new().unwrap();

    flow(dir.path(), &home)
        .arg("status")
        .assert()
        .code(7)
        .stderr(predicate::str::contains("Not a git repository"));
}

#[test]
fn test_status_and_list() {
    let repo = TestRepo::new();
    let home = TempDir::new().unwrap();
    repo.git(&["branch", "feature/a"]);
    repo.git(&["branch", "hotfix/1.0.1"]);

    flow(repo.path(), &home)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("On branch develop (develop)"))
        .stdout(predicate::str::contains("Working tree clean"))
        .stdout(predicate::str::contains("built-in defaults"));

    flow(repo.path(), &home)
        .args(["list", "feature"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Feature branches:\n  feature/a"))
        .stdout(predicate::str::contains("hotfix").not());
}

#[test]
fn test_config_set_and_get() {
    let dir = TempDir::new().unwrap();
    let home = TempDir::new().unwrap();

    flow(dir.path(), &home)
        .args(["config", "branches.develop", "dev"])
        .assert()
        .success();
    assert!(dir.path().join(".flowline.yaml").exists());

    flow(dir.path(), &home)
        .args(["config", "branches.develop"])
        .assert()
        .success()
        .stdout("dev\n");

    flow(dir.path(), &home)
        .args(["config", "options.tag_format", "release"])
        .assert()
        .code(2);
}

#[test]
fn test_malformed_config_is_fatal() {
    let repo = TestRepo::new();
    let home = TempDir::new().unwrap();
    std::fs::write(repo.path().join("broken.yaml"), "branches: [unclosed").unwrap();

    flow(repo.path(), &home)
        .args(["--config", "broken.yaml", "feature", "start", "login"])
        .assert()
        .code(2);
    assert!(!repo.has_branch("feature/login"));
}

#[test]
fn test_init_creates_develop() {
    let repo = TestRepo::bare_master();
    let home = TempDir::new().unwrap();

    flow(repo.path(), &home)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created 'develop' from 'master'"));

    assert!(repo.has_branch("develop"));
    assert!(repo.path().join(".flowline.yaml").exists());

    flow(repo.path(), &home)
        .arg("init")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--force"));
}
