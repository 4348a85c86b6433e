//! Shared test infrastructure for integration tests.
//!
//! Each test gets a temp working directory with a private `bin/` that holds
//! stub `make`, `docker-compose`, and `yarn` scripts. Stubs append their argv
//! to a call log so tests can assert which external commands ran, in order.
#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

pub const TOOLS: [&str; 3] = ["make", "docker-compose", "yarn"];

/// Temp working directory plus stub tools.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    /// Workspace with every external tool stubbed to succeed quietly.
    pub fn new() -> Self {
        let workspace = Self::bare();
        for tool in TOOLS {
            workspace.stub(tool, "exit 0");
        }
        workspace
    }

    /// Workspace with an empty `bin/`: no external tool resolves.
    pub fn bare() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        fs::create_dir_all(dir.path().join("bin")).expect("create bin dir");
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.root().join("bin")
    }

    pub fn call_log(&self) -> PathBuf {
        self.root().join("calls.log")
    }

    /// Write a stub that records its invocation, then runs `body`.
    pub fn stub(&self, name: &str, body: &str) {
        let path = self.bin_dir().join(name);
        let script = format!(
            "#!/bin/sh\necho \"{name} $*\" >> \"$STEPS_CALL_LOG\"\n{body}\n"
        );
        fs::write(&path, script).expect("write stub");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod stub");
    }

    /// Runner invocation confined to the stub `bin/`.
    pub fn command(&self) -> Command {
        let mut command = Command::new(env!("CARGO_BIN_EXE_test-steps"));
        command
            .current_dir(self.root())
            .env("PATH", self.bin_dir())
            .env("STEPS_CALL_LOG", self.call_log())
            .env_remove("TEST_STEPS_CONFIG")
            .env_remove("TEST_STEPS_LOG");
        command
    }

    /// Like [`Workspace::command`] but with system dirs after the stubs.
    pub fn command_with_system_path(&self) -> Command {
        let mut command = self.command();
        let path = format!("{}:/usr/bin:/bin", self.bin_dir().display());
        command.env("PATH", path);
        command
    }

    pub fn run(&self, steps: &[&str]) -> Output {
        self.command().args(steps).output().expect("run test-steps")
    }

    /// Recorded stub invocations, one per line.
    pub fn calls(&self) -> Vec<String> {
        match fs::read_to_string(self.call_log()) {
            Ok(content) => content.lines().map(str::to_string).collect(),
            Err(_) => Vec::new(),
        }
    }
}

pub fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

pub fn stderr_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

pub const ALL_STEP_LINES: [&str; 10] = [
    "[TEST] Making report directory...",
    "[TEST] Done.",
    "[TEST] Building library...",
    "[TEST] Done.",
    "[TEST] Test environment containers running...",
    "[TEST] Done.",
    "[TEST] Running tests...",
    "[TEST] Done.",
    "[TEST] Test environment containers stopping...",
    "[TEST] Done.",
];
