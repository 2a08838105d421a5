//! Common test utilities for Command Center integration tests.
//!
//! Provides `TestEnv` for isolated test environments that don't touch
//! the user's real data file.

#![allow(dead_code)]

use assert_cmd::Command;
use std::path::PathBuf;
pub use tempfile::TempDir;

/// A test environment with an isolated snapshot file.
///
/// The `cmdc()` method returns a `Command` that sets `CC_DATA_FILE` to a
/// file inside a per-test temporary directory, making tests parallel-safe.
pub struct TestEnv {
    pub dir: TempDir,
}

impl TestEnv {
    /// Create a new test environment with an isolated data file.
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    /// Get a Command for the cmdc binary with isolated data file.
    pub fn cmdc(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_cmdc"));
        cmd.current_dir(self.dir.path());
        cmd.env("CC_DATA_FILE", self.data_file());
        cmd
    }

    /// Path of the snapshot file used by this environment.
    pub fn data_file(&self) -> PathBuf {
        self.dir.path().join("data.json")
    }

    /// Run a command and pull the first `"id"` value out of its JSON output.
    ///
    /// Create commands serialize the created entity, whose `id` is the
    /// first plain `"id"` key (`taskId`/`projectId` don't match).
    pub fn create(&self, args: &[&str]) -> String {
        let output = self.cmdc().args(args).assert().success();
        let stdout = String::from_utf8_lossy(&output.get_output().stdout).to_string();
        extract_id(&stdout)
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract the first `"id"` value from a JSON string.
pub fn extract_id(stdout: &str) -> String {
    stdout
        .split("\"id\":\"")
        .nth(1)
        .and_then(|rest| rest.split('"').next())
        .unwrap_or_else(|| panic!("no id found in output: {}", stdout))
        .to_string()
}
