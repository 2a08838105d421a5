//! Smoke tests for the Command Center CLI.
//!
//! These tests verify basic CLI functionality:
//! - `cmdc --version` outputs version info
//! - `cmdc --help` outputs help text
//! - `cmdc` (no args) outputs a valid JSON status summary

mod common;

use common::TestEnv;
use predicates::prelude::*;

#[test]
fn test_version_flag() {
    let env = TestEnv::new();
    env.cmdc()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("cmdc"))
        .stdout(predicate::str::contains("2.0"));
}

#[test]
fn test_help_flag() {
    let env = TestEnv::new();
    env.cmdc()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("Commands:"))
        .stdout(predicate::str::contains("Options:"));
}

#[test]
fn test_help_flag_short() {
    let env = TestEnv::new();
    env.cmdc()
        .arg("-h")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"));
}

#[test]
fn test_no_args_outputs_json_summary() {
    let env = TestEnv::new();
    env.cmdc()
        .assert()
        .success()
        .stdout(predicate::str::contains("\"dataFile\""))
        .stdout(predicate::str::contains("\"projects\":0"))
        .stdout(predicate::str::contains("\"tasks\":0"));
}

#[test]
fn test_no_args_human_readable() {
    let env = TestEnv::new();
    env.cmdc()
        .arg("-H")
        .assert()
        .success()
        .stdout(predicate::str::contains("Command Center"))
        .stdout(predicate::str::contains("Timer: none"));
}

#[test]
fn test_status_summary_reflects_tasks() {
    let env = TestEnv::new();
    env.create(&["task", "create", "First"]);
    env.cmdc()
        .assert()
        .success()
        .stdout(predicate::str::contains("\"tasks\":1"))
        .stdout(predicate::str::contains("\"todo\":1"));
}

#[test]
fn test_build_info() {
    let env = TestEnv::new();
    env.cmdc()
        .arg("build-info")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"version\""))
        .stdout(predicate::str::contains("\"commit\""))
        .stdout(predicate::str::contains("\"built\""));
}

#[test]
fn test_build_info_human() {
    let env = TestEnv::new();
    env.cmdc()
        .args(["build-info", "-H"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Version:"))
        .stdout(predicate::str::contains("Commit:"));
}

#[test]
fn test_task_help() {
    let env = TestEnv::new();
    env.cmdc()
        .args(["task", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("create"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("move"));
}

#[test]
fn test_unknown_command_fails() {
    let env = TestEnv::new();
    env.cmdc().arg("frobnicate").assert().failure();
}
