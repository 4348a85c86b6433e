//! The fixed step table.
//!
//! Order in [`STEPS`] is the only ordering guarantee the runner provides:
//! selected steps always run in table order, whatever order they were named
//! in on the command line.
use std::fmt;
use std::path::{Path, PathBuf};

/// Line printed after every executed step, whatever its outcome.
pub const DONE_MESSAGE: &str = "Done.";

/// Directory created by `report-dir` unless the config overrides it.
pub const DEFAULT_REPORT_DIR: &str = "test-report";

/// What a step does when no config override applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultAction {
    /// Create the report directory (and parents) if absent.
    ReportDir,
    /// Run each argv in order, stopping at the first failure.
    Commands(&'static [&'static [&'static str]]),
}

/// One named, independently selectable unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub name: &'static str,
    pub start_message: &'static str,
    pub default_action: DefaultAction,
}

impl Step {
    /// Only command-backed steps accept command overrides.
    pub fn accepts_command_override(&self) -> bool {
        matches!(self.default_action, DefaultAction::Commands(_))
    }
}

pub const STEPS: &[Step] = &[
    Step {
        name: "report-dir",
        start_message: "Making report directory...",
        default_action: DefaultAction::ReportDir,
    },
    Step {
        name: "build",
        start_message: "Building library...",
        default_action: DefaultAction::Commands(&[&["make"]]),
    },
    Step {
        name: "containers:up",
        start_message: "Test environment containers running...",
        default_action: DefaultAction::Commands(&[
            &["docker-compose", "build"],
            &["docker-compose", "up", "-d"],
        ]),
    },
    Step {
        name: "test",
        start_message: "Running tests...",
        default_action: DefaultAction::Commands(&[&["yarn", "jest"]]),
    },
    Step {
        name: "containers:down",
        start_message: "Test environment containers stopping...",
        default_action: DefaultAction::Commands(&[&[
            "docker-compose",
            "down",
            "-v",
            "--rmi",
            "all",
        ]]),
    },
];

pub fn find_step(name: &str) -> Option<&'static Step> {
    STEPS.iter().find(|step| step.name == name)
}

pub fn is_known_step(name: &str) -> bool {
    find_step(name).is_some()
}

/// A step's action after config overrides have been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    EnsureDir(PathBuf),
    /// Each entry is a full argv; entries chain with `&&` semantics.
    Commands(Vec<Vec<String>>),
}

impl Action {
    pub fn from_default(default: DefaultAction, report_dir: &Path) -> Self {
        match default {
            DefaultAction::ReportDir => Action::EnsureDir(report_dir.to_path_buf()),
            DefaultAction::Commands(commands) => Action::Commands(
                commands
                    .iter()
                    .map(|argv| argv.iter().map(|arg| arg.to_string()).collect())
                    .collect(),
            ),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::EnsureDir(path) => write!(f, "mkdir -p {}", path.display()),
            Action::Commands(commands) => {
                let rendered: Vec<String> = commands
                    .iter()
                    .map(|argv| shell_words::join(argv.iter()))
                    .collect();
                f.write_str(&rendered.join(" && "))
            }
        }
    }
}
