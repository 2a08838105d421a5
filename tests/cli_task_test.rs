//! Integration tests for task CRUD and board movement via the CLI.
//!
//! Verifies `cmdc task create/list/show/update/move/reorder/delete`:
//! - Creation defaults and flags, template stamping
//! - Filtering by project, status, assignee, and priority
//! - The blocker guard on `task move --to done`
//! - Column ordering after moves and reorders

mod common;

use common::TestEnv;
use predicates::prelude::*;

// === Create ===

#[test]
fn test_task_create_json() {
    let env = TestEnv::new();
    env.cmdc()
        .args(["task", "create", "My first task"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"id\":\"task-"))
        .stdout(predicate::str::contains("\"title\":\"My first task\""))
        .stdout(predicate::str::contains("\"status\":\"todo\""))
        .stdout(predicate::str::contains("\"priority\":\"medium\""))
        .stdout(predicate::str::contains("\"progress\":0"));
}

#[test]
fn test_task_create_human() {
    let env = TestEnv::new();
    env.cmdc()
        .args(["-H", "task", "create", "My first task"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created task task-"))
        .stdout(predicate::str::contains("\"My first task\""));
}

#[test]
fn test_task_create_with_options() {
    let env = TestEnv::new();
    let project_id = env.create(&["project", "create", "Launch"]);
    env.cmdc()
        .args([
            "task",
            "create",
            "Priority task",
            "--project",
            &project_id,
            "--priority",
            "high",
            "-t",
            "backend",
            "-t",
            "urgent",
            "-a",
            "kris",
            "-d",
            "A detailed description",
            "--due",
            "2026-12-31",
            "--estimate",
            "1.5",
            "--model",
            "opus",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"priority\":\"high\""))
        .stdout(predicate::str::contains("\"tags\":[\"backend\",\"urgent\"]"))
        .stdout(predicate::str::contains("\"assignee\":\"kris\""))
        .stdout(predicate::str::contains("\"dueDate\":\"2026-12-31\""))
        .stdout(predicate::str::contains("\"estimatedCost\":1.5"))
        .stdout(predicate::str::contains("\"model\":\"opus\""));
}

#[test]
fn test_task_create_empty_title_fails() {
    let env = TestEnv::new();
    env.cmdc()
        .args(["task", "create", "  "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be empty"));
}

#[test]
fn test_task_create_invalid_status_fails() {
    let env = TestEnv::new();
    env.cmdc()
        .args(["task", "create", "T", "--status", "bogus"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown task status"));
}

#[test]
fn test_task_create_invalid_date_fails() {
    let env = TestEnv::new();
    env.cmdc()
        .args(["task", "create", "T", "--due", "tomorrow"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("YYYY-MM-DD"));
}

#[test]
fn test_task_create_from_template() {
    let env = TestEnv::new();
    let template_id = env.create(&[
        "template",
        "create",
        "Bug report",
        "-a",
        "nyx",
        "--priority",
        "high",
        "-t",
        "bug",
        "-d",
        "Steps to reproduce",
    ]);

    env.cmdc()
        .args([
            "task",
            "create",
            "Crash on save",
            "--from-template",
            &template_id,
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"assignee\":\"nyx\""))
        .stdout(predicate::str::contains("\"priority\":\"high\""))
        .stdout(predicate::str::contains("\"tags\":[\"bug\"]"))
        .stdout(predicate::str::contains("\"description\":\"Steps to reproduce\""));
}

#[test]
fn test_task_create_template_overridden_by_flags() {
    let env = TestEnv::new();
    let template_id = env.create(&[
        "template", "create", "Bug report", "-a", "nyx", "--priority", "high",
    ]);

    env.cmdc()
        .args([
            "task",
            "create",
            "Crash on load",
            "--from-template",
            &template_id,
            "-a",
            "kris",
            "--priority",
            "low",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"assignee\":\"kris\""))
        .stdout(predicate::str::contains("\"priority\":\"low\""));
}

#[test]
fn test_task_create_missing_template_fails() {
    let env = TestEnv::new();
    env.cmdc()
        .args(["task", "create", "T", "--from-template", "tmpl-0000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

// === List & filters ===

#[test]
fn test_task_list_counts() {
    let env = TestEnv::new();
    env.create(&["task", "create", "One"]);
    env.create(&["task", "create", "Two"]);
    env.cmdc()
        .args(["task", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"count\":2"));
}

#[test]
fn test_task_list_filter_by_status() {
    let env = TestEnv::new();
    env.create(&["task", "create", "Open"]);
    env.create(&["task", "create", "Started", "--status", "in-progress"]);

    env.cmdc()
        .args(["task", "list", "--status", "in-progress"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"count\":1"))
        .stdout(predicate::str::contains("\"title\":\"Started\""));
}

#[test]
fn test_task_list_filter_by_assignee_and_priority() {
    let env = TestEnv::new();
    env.create(&["task", "create", "A", "-a", "kris", "--priority", "high"]);
    env.create(&["task", "create", "B", "-a", "kris", "--priority", "low"]);
    env.create(&["task", "create", "C", "-a", "taylor", "--priority", "high"]);

    env.cmdc()
        .args(["task", "list", "--assignee", "kris", "--priority", "high"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"count\":1"))
        .stdout(predicate::str::contains("\"title\":\"A\""));
}

#[test]
fn test_task_list_filter_by_project() {
    let env = TestEnv::new();
    let project_id = env.create(&["project", "create", "Launch"]);
    env.create(&["task", "create", "In project", "--project", &project_id]);
    env.create(&["task", "create", "Loose"]);

    env.cmdc()
        .args(["task", "list", "--project", &project_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"count\":1"))
        .stdout(predicate::str::contains("\"title\":\"In project\""));
}

#[test]
fn test_task_list_human() {
    let env = TestEnv::new();
    env.create(&["task", "create", "One"]);
    env.cmdc()
        .args(["-H", "task", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 task(s)"))
        .stdout(predicate::str::contains("\"One\""));
}

// === Show ===

#[test]
fn test_task_show_detail() {
    let env = TestEnv::new();
    let task_id = env.create(&["task", "create", "Inspect me", "-a", "taylor"]);
    env.cmdc()
        .args(["task", "show", &task_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"task\""))
        .stdout(predicate::str::contains("\"title\":\"Inspect me\""))
        .stdout(predicate::str::contains("\"unresolvedBlockers\":false"))
        .stdout(predicate::str::contains("\"blockers\":[]"));
}

#[test]
fn test_task_show_reports_blockers() {
    let env = TestEnv::new();
    let blocker_id = env.create(&["task", "create", "First"]);
    let task_id = env.create(&["task", "create", "Second", "--blocked-by", &blocker_id]);

    env.cmdc()
        .args(["task", "show", &task_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"unresolvedBlockers\":true"))
        .stdout(predicate::str::contains(format!("\"id\":\"{}\"", blocker_id)));

    env.cmdc()
        .args(["-H", "task", "show", &task_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("unresolved"));
}

#[test]
fn test_task_show_not_found() {
    let env = TestEnv::new();
    env.cmdc()
        .args(["task", "show", "task-0000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

// === Update ===

#[test]
fn test_task_update_title_and_priority() {
    let env = TestEnv::new();
    let task_id = env.create(&["task", "create", "Old"]);
    env.cmdc()
        .args([
            "task", "update", &task_id, "--title", "New", "--priority", "critical",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"title\":\"New\""))
        .stdout(predicate::str::contains("\"priority\":\"critical\""));
}

#[test]
fn test_task_update_status_done_forces_progress() {
    let env = TestEnv::new();
    let task_id = env.create(&["task", "create", "Finish me"]);
    env.cmdc()
        .args(["task", "update", &task_id, "--status", "done"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\":\"done\""))
        .stdout(predicate::str::contains("\"progress\":100"));
}

#[test]
fn test_task_update_empty_string_clears_assignee() {
    let env = TestEnv::new();
    let task_id = env.create(&["task", "create", "T", "-a", "kris"]);
    env.cmdc()
        .args(["task", "update", &task_id, "--assignee", ""])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"assignee\":null"));
}

#[test]
fn test_task_update_progress() {
    let env = TestEnv::new();
    let task_id = env.create(&["task", "create", "T"]);
    env.cmdc()
        .args(["task", "update", &task_id, "--progress", "60"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"progress\":60"));
}

#[test]
fn test_task_update_not_found() {
    let env = TestEnv::new();
    env.cmdc()
        .args(["task", "update", "task-0000", "--title", "X"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

// === Move ===

#[test]
fn test_task_move_changes_column() {
    let env = TestEnv::new();
    let task_id = env.create(&["task", "create", "Mover"]);
    env.cmdc()
        .args(["task", "move", &task_id, "--to", "in-progress"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"from\":\"todo\""))
        .stdout(predicate::str::contains("\"to\":\"in-progress\""))
        .stdout(predicate::str::contains("\"status\":\"in-progress\""));
}

#[test]
fn test_task_move_human() {
    let env = TestEnv::new();
    let task_id = env.create(&["task", "create", "Mover"]);
    env.cmdc()
        .args(["-H", "task", "move", &task_id, "--to", "done"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Moved task"))
        .stdout(predicate::str::contains("✅ Done"));
}

#[test]
fn test_task_move_to_done_blocked_fails() {
    let env = TestEnv::new();
    let blocker_id = env.create(&["task", "create", "First"]);
    let task_id = env.create(&["task", "create", "Second", "--blocked-by", &blocker_id]);

    env.cmdc()
        .args(["task", "move", &task_id, "--to", "done"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("blocked"))
        .stderr(predicate::str::contains("--force"));

    // Still in todo
    env.cmdc()
        .args(["task", "show", &task_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\":\"todo\""));
}

#[test]
fn test_task_move_to_done_with_force() {
    let env = TestEnv::new();
    let blocker_id = env.create(&["task", "create", "First"]);
    let task_id = env.create(&["task", "create", "Second", "--blocked-by", &blocker_id]);

    env.cmdc()
        .args(["task", "move", &task_id, "--to", "done", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\":\"done\""))
        .stdout(predicate::str::contains("\"progress\":100"));
}

#[test]
fn test_task_move_allowed_after_blocker_done() {
    let env = TestEnv::new();
    let blocker_id = env.create(&["task", "create", "First"]);
    let task_id = env.create(&["task", "create", "Second", "--blocked-by", &blocker_id]);

    env.cmdc()
        .args(["task", "move", &blocker_id, "--to", "done"])
        .assert()
        .success();
    env.cmdc()
        .args(["task", "move", &task_id, "--to", "done"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\":\"done\""));
}

#[test]
fn test_task_move_with_index_positions_task() {
    let env = TestEnv::new();
    let first_id = env.create(&["task", "create", "First"]);
    let second_id = env.create(&["task", "create", "Second"]);
    env.cmdc()
        .args(["task", "move", &first_id, "--to", "in-progress"])
        .assert()
        .success();
    env.cmdc()
        .args([
            "task",
            "move",
            &second_id,
            "--to",
            "in-progress",
            "--index",
            "0",
        ])
        .assert()
        .success();

    // Second lands at the head of the column, pushing First down
    env.cmdc()
        .args(["task", "show", &second_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"order\":0"));
    env.cmdc()
        .args(["task", "show", &first_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"order\":1"));
}

// === Reorder ===

#[test]
fn test_task_reorder_within_column() {
    let env = TestEnv::new();
    let first_id = env.create(&["task", "create", "First"]);
    env.create(&["task", "create", "Second"]);

    env.cmdc()
        .args(["task", "reorder", &first_id, "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\":\"todo\""))
        .stdout(predicate::str::contains("\"order\":1"));
}

#[test]
fn test_task_reorder_keeps_status() {
    let env = TestEnv::new();
    let task_id = env.create(&["task", "create", "Halfway"]);
    env.cmdc()
        .args(["task", "update", &task_id, "--progress", "40"])
        .assert()
        .success();

    // Naming another column renumbers it; the task itself stays put
    env.cmdc()
        .args(["task", "reorder", &task_id, "0", "--status", "done"])
        .assert()
        .success();

    env.cmdc()
        .args(["task", "show", &task_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\":\"todo\""))
        .stdout(predicate::str::contains("\"progress\":40"));
    env.cmdc()
        .args(["task", "list", "--status", "done"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"count\":0"));
}

#[test]
fn test_task_reorder_not_found() {
    let env = TestEnv::new();
    env.cmdc()
        .args(["task", "reorder", "task-0000", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

// === Delete ===

#[test]
fn test_task_delete() {
    let env = TestEnv::new();
    let task_id = env.create(&["task", "create", "Doomed"]);
    env.cmdc()
        .args(["task", "delete", &task_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"deleted\":true"));

    env.cmdc()
        .args(["task", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"count\":0"));
}

#[test]
fn test_task_delete_not_found() {
    let env = TestEnv::new();
    env.cmdc()
        .args(["task", "delete", "task-0000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

// === Persistence across invocations ===

#[test]
fn test_tasks_persist_between_runs() {
    let env = TestEnv::new();
    let task_id = env.create(&["task", "create", "Durable"]);
    assert!(env.data_file().exists());

    env.cmdc()
        .args(["task", "show", &task_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"title\":\"Durable\""));
}
