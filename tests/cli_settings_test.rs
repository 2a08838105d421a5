mod common;

use common::TestEnv;
use predicates::prelude::*;

#[test]
fn test_settings_show_default() {
    let env = TestEnv::new();
    env.cmdc()
        .args(["settings", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"theme\":\"dark\""))
        .stdout(predicate::str::contains("\"createdAt\":"));
}

#[test]
fn test_settings_show_human() {
    let env = TestEnv::new();
    env.cmdc()
        .args(["-H", "settings", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Theme: dark"))
        .stdout(predicate::str::contains("Since:"));
}

#[test]
fn test_settings_theme_switch_persists() {
    let env = TestEnv::new();
    env.cmdc()
        .args(["settings", "theme", "light"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"theme\":\"light\""));

    // Fresh process, same data file.
    env.cmdc()
        .args(["settings", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"theme\":\"light\""));
}

#[test]
fn test_settings_theme_invalid_rejected() {
    let env = TestEnv::new();
    env.cmdc()
        .args(["settings", "theme", "solarized"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}
