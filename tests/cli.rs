// ABOUTME: Integration tests for the smoke-runner CLI commands.
// ABOUTME: Validates --help output, init behavior and failures that need no runtime.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn smoke_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("smoke-runner"))
}

#[test]
fn help_shows_commands() {
    smoke_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn run_help_shows_options() {
    smoke_cmd()
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--file"))
        .stdout(predicate::str::contains("--tag"))
        .stdout(predicate::str::contains("--no-keep-alive"))
        .stdout(predicate::str::contains("--strict-cleanup"));
}

#[test]
fn init_creates_config_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("smoke.yml");

    smoke_cmd()
        .current_dir(temp_dir.path())
        .args(["init", "--file", "Dockerfile.ipex", "--tag", "intel_image:latest"])
        .assert()
        .success();

    assert!(config_path.exists(), "smoke.yml should be created");
    let content = fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("dockerfile: Dockerfile.ipex"));
    assert!(content.contains("tag: intel_image:latest"));
}

#[test]
fn init_refuses_to_overwrite_existing_config() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("smoke.yml");

    fs::write(&config_path, "tag: existing:v1").unwrap();

    smoke_cmd()
        .current_dir(temp_dir.path())
        .arg("init")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("already exists"));

    assert_eq!(fs::read_to_string(&config_path).unwrap(), "tag: existing:v1");
}

#[test]
fn init_force_overwrites() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("smoke.yml");

    fs::write(&config_path, "tag: existing:v1").unwrap();

    smoke_cmd()
        .current_dir(temp_dir.path())
        .args(["init", "--force"])
        .assert()
        .success();

    assert!(fs::read_to_string(&config_path).unwrap().contains("timeouts:"));
}

#[test]
fn run_without_tag_fails_before_touching_runtime() {
    let temp_dir = tempfile::tempdir().unwrap();

    smoke_cmd()
        .current_dir(temp_dir.path())
        .arg("run")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("no image tag given"));
}

#[test]
fn run_rejects_invalid_tag() {
    smoke_cmd()
        .args(["run", "--tag", "Intel_Image:latest"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("lowercase"));
}

#[test]
fn run_reports_broken_config() {
    let temp_dir = tempfile::tempdir().unwrap();
    fs::write(temp_dir.path().join("smoke.yml"), "settle: [not, a, duration]\n").unwrap();

    smoke_cmd()
        .current_dir(temp_dir.path())
        .arg("run")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("YAML parse error"));
}

#[test]
fn json_errors_are_json() {
    let temp_dir = tempfile::tempdir().unwrap();

    let assert = smoke_cmd()
        .current_dir(temp_dir.path())
        .args(["--json", "run"])
        .assert()
        .failure();

    let stderr = String::from_utf8(assert.get_output().stderr.clone()).unwrap();
    let line = stderr.lines().last().expect("an error line");
    let event: serde_json::Value = serde_json::from_str(line).unwrap();
    assert_eq!(event["event"], "error");
}
