//! Synchronous execution of step actions.
//!
//! Failures are values, not errors: a step that fails never aborts the run,
//! so [`Executor::execute`] always returns an outcome.
use crate::signals;
use crate::steps::Action;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use std::time::Instant;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Succeeded,
    Failed(Failure),
}

impl StepOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, StepOutcome::Failed(_))
    }
}

/// Why an action did not succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    ExitCode { command: String, code: i32 },
    Signal { command: String, signal: i32 },
    NotFound { program: String },
    Spawn { command: String, message: String },
    Io { path: PathBuf, message: String },
    /// A chained command that was never spawned because a signal arrived.
    Interrupted { command: String, signal: i32 },
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::ExitCode { command, code } => {
                write!(f, "`{command}` exited with status {code}")
            }
            Failure::Signal { command, signal } => {
                write!(f, "`{command}` terminated by signal {signal}")
            }
            Failure::NotFound { program } => write!(f, "`{program}` not found on PATH"),
            Failure::Spawn { command, message } => write!(f, "spawn `{command}`: {message}"),
            Failure::Io { path, message } => write!(f, "{}: {message}", path.display()),
            Failure::Interrupted { command, signal } => {
                write!(f, "`{command}` skipped after signal {signal}")
            }
        }
    }
}

/// Runs step actions. The runner only sees this seam.
pub trait Executor {
    fn execute(&mut self, action: &Action) -> StepOutcome;

    /// Signal that should stop the run before the next step, if any.
    fn interrupted(&self) -> Option<i32> {
        None
    }
}

type InterruptSource = Box<dyn Fn() -> Option<i32>>;

/// Executes actions against the real filesystem and `PATH`.
pub struct SystemExecutor {
    path_override: Option<std::ffi::OsString>,
    interrupt: InterruptSource,
}

impl Default for SystemExecutor {
    fn default() -> Self {
        Self {
            path_override: None,
            interrupt: Box::new(signals::interrupted),
        }
    }
}

impl SystemExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve programs against `path` instead of the process `PATH`.
    #[cfg(test)]
    pub fn with_search_path(path: impl Into<std::ffi::OsString>) -> Self {
        Self {
            path_override: Some(path.into()),
            ..Self::default()
        }
    }

    /// Read interrupts from `source` instead of the process signal state.
    #[cfg(test)]
    pub fn with_interrupt(mut self, source: impl Fn() -> Option<i32> + 'static) -> Self {
        self.interrupt = Box::new(source);
        self
    }

    fn resolve_program(&self, program: &str) -> Option<PathBuf> {
        match &self.path_override {
            Some(paths) => {
                let cwd = std::env::current_dir().ok()?;
                which::which_in(program, Some(paths), cwd).ok()
            }
            None => which::which(program).ok(),
        }
    }

    fn run_command(&self, argv: &[String]) -> StepOutcome {
        let command = shell_words::join(argv.iter());
        let Some((program, args)) = argv.split_first() else {
            return StepOutcome::Failed(Failure::Spawn {
                command,
                message: "empty command".to_string(),
            });
        };
        if let Some(signal) = (self.interrupt)() {
            return StepOutcome::Failed(Failure::Interrupted { command, signal });
        }
        let Some(resolved) = self.resolve_program(program) else {
            return StepOutcome::Failed(Failure::NotFound {
                program: program.clone(),
            });
        };

        tracing::debug!(command = %command, program = %resolved.display(), "spawn");
        let start = Instant::now();
        let mut child = match Command::new(&resolved).args(args).spawn() {
            Ok(child) => child,
            Err(err) => {
                return StepOutcome::Failed(Failure::Spawn {
                    command,
                    message: err.to_string(),
                })
            }
        };
        signals::track_child(child.id());
        // A signal that landed before the child was tracked was not forwarded.
        if let Some(signo) = (self.interrupt)() {
            signals::forward(child.id(), signo);
        }
        let waited = child.wait();
        signals::untrack_child();
        let elapsed_ms = start.elapsed().as_millis();

        match waited {
            Ok(status) => {
                tracing::info!(command = %command, elapsed_ms, %status, "command complete");
                outcome_from_status(command, status)
            }
            Err(err) => StepOutcome::Failed(Failure::Spawn {
                command,
                message: format!("wait: {err}"),
            }),
        }
    }
}

impl Executor for SystemExecutor {
    fn execute(&mut self, action: &Action) -> StepOutcome {
        match action {
            Action::EnsureDir(path) => ensure_dir(path),
            Action::Commands(commands) => {
                for argv in commands {
                    let outcome = self.run_command(argv);
                    if outcome.is_failure() {
                        return outcome;
                    }
                }
                StepOutcome::Succeeded
            }
        }
    }

    fn interrupted(&self) -> Option<i32> {
        (self.interrupt)()
    }
}

fn ensure_dir(path: &Path) -> StepOutcome {
    match fs::create_dir_all(path) {
        Ok(()) => StepOutcome::Succeeded,
        Err(err) => StepOutcome::Failed(Failure::Io {
            path: path.to_path_buf(),
            message: err.to_string(),
        }),
    }
}

fn outcome_from_status(command: String, status: ExitStatus) -> StepOutcome {
    if status.success() {
        return StepOutcome::Succeeded;
    }
    if let Some(code) = status.code() {
        return StepOutcome::Failed(Failure::ExitCode { command, code });
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return StepOutcome::Failed(Failure::Signal { command, signal });
        }
    }
    StepOutcome::Failed(Failure::Spawn {
        command,
        message: format!("unrecognized exit status {status}"),
    })
}
