//! Command-line integration tests
//!
//! None of these open a capture device.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn switchyard() -> Command {
    let mut cmd = Command::cargo_bin("switchyard").unwrap();
    cmd.env_remove("SWITCHYARD_CONFIG").env_remove("RUST_LOG");
    cmd
}

fn config_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_help() {
    switchyard()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("multi-interface packet capture"))
        .stdout(predicate::str::contains("interfaces"));
}

#[test]
fn test_config_generate_stdout() {
    switchyard()
        .args(["config", "generate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[capture]"))
        .stdout(predicate::str::contains("poll_interval_ms = 200"));
}

#[test]
fn test_config_generate_file_validates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("switchyard.toml");

    switchyard()
        .args(["config", "generate", "-o"])
        .arg(&path)
        .assert()
        .success();

    switchyard()
        .args(["config", "validate"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"));
}

#[test]
fn test_config_validate_rejects_bad_poll_interval() {
    let file = config_file("[capture]\npoll_interval_ms = 0\n");
    switchyard()
        .args(["config", "validate"])
        .arg(file.path())
        .assert()
        .failure();
}

#[test]
fn test_config_show_applies_overrides() {
    let file = config_file("name = \"edge\"\n[devices]\ninclude = [\"eth0\"]\n");
    switchyard()
        .args(["config", "show", "-x", "eth3", "-c"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("name = \"edge\""))
        .stdout(predicate::str::contains("eth3"));
}

#[test]
fn test_completions_bash() {
    switchyard()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("switchyard"));
}

#[test]
fn test_completions_powershell() {
    switchyard()
        .args(["completions", "powershell"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Register-ArgumentCompleter"));
}

#[test]
fn test_interfaces_lists_without_privileges() {
    switchyard().arg("interfaces").assert().success();
}

#[test]
fn test_run_unknown_interface_fails() {
    switchyard()
        .args(["run", "--dry-run", "-q", "-i", "nonexistent0"])
        .assert()
        .failure();
}
