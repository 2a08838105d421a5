//! Integration tests for comment commands via the CLI.
//!
//! Verifies `cmdc comment add/list` and @-mention detection.

mod common;

use common::TestEnv;
use predicates::prelude::*;

// === Add ===

#[test]
fn test_comment_add_json() {
    let env = TestEnv::new();
    let task_id = env.create(&["task", "create", "Discuss"]);
    env.cmdc()
        .args(["comment", "add", &task_id, "Looks good to me"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"id\":\"cmt-"))
        .stdout(predicate::str::contains("\"text\":\"Looks good to me\""))
        .stdout(predicate::str::contains("\"author\":\"user\""))
        .stdout(predicate::str::contains("\"notified\":[]"));
}

#[test]
fn test_comment_add_with_author() {
    let env = TestEnv::new();
    let task_id = env.create(&["task", "create", "Discuss"]);
    env.cmdc()
        .args(["comment", "add", &task_id, "On it", "--by", "taylor"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"author\":\"taylor\""));
}

#[test]
fn test_comment_add_reports_mentions() {
    let env = TestEnv::new();
    let task_id = env.create(&["task", "create", "Discuss"]);
    env.cmdc()
        .args([
            "comment",
            "add",
            &task_id,
            "@kris and @nyx please review",
            "--by",
            "taylor",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"notified\":[\"kris\",\"nyx\"]"));
}

#[test]
fn test_comment_add_mention_case_insensitive() {
    let env = TestEnv::new();
    let task_id = env.create(&["task", "create", "Discuss"]);
    env.cmdc()
        .args(["comment", "add", &task_id, "@KRIS ping"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"notified\":[\"kris\"]"));
}

#[test]
fn test_comment_add_unknown_mention_ignored() {
    let env = TestEnv::new();
    let task_id = env.create(&["task", "create", "Discuss"]);
    env.cmdc()
        .args(["comment", "add", &task_id, "@nobody are you there"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"notified\":[]"));
}

#[test]
fn test_comment_add_human_mentions() {
    let env = TestEnv::new();
    let task_id = env.create(&["task", "create", "Discuss"]);
    env.cmdc()
        .args(["-H", "comment", "add", &task_id, "@kris take a look"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Commented on task-"))
        .stdout(predicate::str::contains("notified kris"));
}

#[test]
fn test_comment_add_empty_text_fails() {
    let env = TestEnv::new();
    let task_id = env.create(&["task", "create", "Discuss"]);
    env.cmdc()
        .args(["comment", "add", &task_id, "  "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be empty"));
}

#[test]
fn test_comment_add_missing_task_fails() {
    let env = TestEnv::new();
    env.cmdc()
        .args(["comment", "add", "task-0000", "hello"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

// === List ===

#[test]
fn test_comment_list() {
    let env = TestEnv::new();
    let task_id = env.create(&["task", "create", "Discuss"]);
    env.cmdc()
        .args(["comment", "add", &task_id, "First thought"])
        .assert()
        .success();
    env.cmdc()
        .args(["comment", "add", &task_id, "Second thought"])
        .assert()
        .success();

    env.cmdc()
        .args(["comment", "list", &task_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"count\":2"))
        .stdout(predicate::str::contains("First thought"))
        .stdout(predicate::str::contains("Second thought"));
}

#[test]
fn test_comment_list_human() {
    let env = TestEnv::new();
    let task_id = env.create(&["task", "create", "Discuss"]);
    env.cmdc()
        .args(["comment", "add", &task_id, "A note", "--by", "nyx"])
        .assert()
        .success();

    env.cmdc()
        .args(["-H", "comment", "list", &task_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 comment(s)"))
        .stdout(predicate::str::contains("nyx: A note"));
}

#[test]
fn test_comment_list_missing_task_fails() {
    let env = TestEnv::new();
    env.cmdc()
        .args(["comment", "list", "task-0000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}
