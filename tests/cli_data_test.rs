mod common;

use common::TestEnv;
use predicates::prelude::*;

// === Export ===

#[test]
fn test_data_export_stdout_is_snapshot() {
    let env = TestEnv::new();
    env.create(&["project", "create", "Apollo"]);
    env.create(&["task", "create", "Ship it"]);

    env.cmdc()
        .args(["data", "export"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"projects\": ["))
        .stdout(predicate::str::contains("\"tasks\": ["))
        .stdout(predicate::str::contains("\"activityLog\": ["))
        .stdout(predicate::str::contains("\"name\": \"Apollo\""))
        .stdout(predicate::str::contains("\"exported\"").not());
}

#[test]
fn test_data_export_to_file() {
    let env = TestEnv::new();
    env.create(&["project", "create", "Apollo"]);
    env.create(&["task", "create", "Ship it"]);
    let path = env.dir.path().join("backup.json");
    let path_str = path.to_str().unwrap().to_string();

    env.cmdc()
        .args(["data", "export", &path_str])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"exported\":true"))
        .stdout(predicate::str::contains("\"projects\":1"))
        .stdout(predicate::str::contains("\"tasks\":1"));

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("\"name\": \"Apollo\""));
    assert!(written.contains("\"title\": \"Ship it\""));
}

#[test]
fn test_data_export_to_file_human() {
    let env = TestEnv::new();
    env.create(&["task", "create", "Ship it"]);
    let path = env.dir.path().join("backup.json");
    let path_str = path.to_str().unwrap().to_string();

    env.cmdc()
        .args(["-H", "data", "export", &path_str])
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 0 project(s) and 1 task(s)"));
}

// === Import ===

#[test]
fn test_data_import_replaces_everything() {
    let env = TestEnv::new();
    env.create(&["task", "create", "Keep me"]);
    let path = env.dir.path().join("backup.json");
    let path_str = path.to_str().unwrap().to_string();
    env.cmdc()
        .args(["data", "export", &path_str])
        .assert()
        .success();

    env.cmdc().args(["data", "clear", "--force"]).assert().success();
    env.create(&["task", "create", "Discard me"]);

    env.cmdc()
        .args(["data", "import", &path_str])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"imported\":true"))
        .stdout(predicate::str::contains("\"tasks\":1"));

    env.cmdc()
        .args(["task", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Keep me"))
        .stdout(predicate::str::contains("Discard me").not());
}

#[test]
fn test_data_import_from_stdin() {
    let env = TestEnv::new();
    env.create(&["task", "create", "Old task"]);

    env.cmdc()
        .args(["data", "import", "-"])
        .write_stdin(r#"{"projects":[],"tasks":[]}"#)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"imported\":true"))
        .stdout(predicate::str::contains("\"projects\":0"))
        .stdout(predicate::str::contains("\"tasks\":0"));

    env.cmdc()
        .assert()
        .success()
        .stdout(predicate::str::contains("\"tasks\":0"));
}

#[test]
fn test_data_import_invalid_json_fails() {
    let env = TestEnv::new();
    env.create(&["task", "create", "Survivor"]);

    env.cmdc()
        .args(["data", "import", "-"])
        .write_stdin("not json at all")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not a valid snapshot"));

    // Rejection leaves data untouched.
    env.cmdc()
        .args(["task", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"count\":1"));
}

#[test]
fn test_data_import_missing_arrays_fails() {
    let env = TestEnv::new();
    env.cmdc()
        .args(["data", "import", "-"])
        .write_stdin(r#"{"projects":[]}"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not a valid snapshot"));
}

#[test]
fn test_data_import_missing_file_fails() {
    let env = TestEnv::new();
    env.cmdc()
        .args(["data", "import", "/nonexistent/backup.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("IO error"));
}

// === Clear ===

#[test]
fn test_data_clear_requires_force() {
    let env = TestEnv::new();
    env.create(&["task", "create", "Precious"]);

    env.cmdc()
        .args(["data", "clear"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    env.cmdc()
        .args(["task", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"count\":1"));
}

#[test]
fn test_data_clear_force_wipes() {
    let env = TestEnv::new();
    env.create(&["project", "create", "Apollo"]);
    env.create(&["task", "create", "Ship it"]);

    env.cmdc()
        .args(["data", "clear", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"cleared\":true"));

    env.cmdc()
        .assert()
        .success()
        .stdout(predicate::str::contains("\"projects\":0"))
        .stdout(predicate::str::contains("\"tasks\":0"));
}

#[test]
fn test_data_clear_force_human() {
    let env = TestEnv::new();
    env.cmdc()
        .args(["-H", "data", "clear", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("All data cleared"));
}
