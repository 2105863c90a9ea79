//! Binary-level smoke tests for commands that do not need a cluster.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn scratch_app() -> tempfile::TempDir {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(
        tmp.path().join("app.yaml"),
        "name: guestbook\nenvironments:\n  dev:\n    server: https://dev.example.com\n  prod:\n    server: https://prod.example.com\n",
    )
    .unwrap();
    fs::create_dir_all(tmp.path().join("components")).unwrap();
    tmp
}

#[test]
fn env_list_prints_configured_environments() {
    let tmp = scratch_app();

    Command::cargo_bin("kubecheck")
        .unwrap()
        .args(["env", "list", "--app-dir"])
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("dev"))
        .stdout(predicate::str::contains("https://prod.example.com"));
}

#[test]
fn unknown_environment_is_fatal() {
    let tmp = scratch_app();

    Command::cargo_bin("kubecheck")
        .unwrap()
        .args(["validate", "staging", "--app-dir"])
        .arg(tmp.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("staging"));
}

#[test]
fn missing_app_root_is_fatal() {
    let tmp = tempfile::tempdir().unwrap();

    Command::cargo_bin("kubecheck")
        .unwrap()
        .args(["validate", "dev", "--app-dir"])
        .arg(tmp.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("app.yaml"));
}

#[test]
fn help_mentions_component_flag() {
    Command::cargo_bin("kubecheck")
        .unwrap()
        .args(["validate", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--component"));
}
