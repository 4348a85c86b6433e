//! Step sequencing.
//!
//! Walks the step table once, in order, and runs every step the selection
//! includes. Each executed step writes exactly two `[TEST]` lines to the step
//! log: its start message, then `Done.`, whatever the outcome.
use crate::config::ResolvedConfig;
use crate::exec::{Executor, StepOutcome};
use crate::selection::Selection;
use crate::steps::{DONE_MESSAGE, STEPS};
use anyhow::{Context, Result};
use std::io::Write;

/// Prefix of every step log line.
pub const LOG_PREFIX: &str = "[TEST] ";

/// Line-oriented step log; flushed per line so it interleaves with child output.
pub struct StepLog<W: Write> {
    out: W,
}

impl<W: Write> StepLog<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn line(&mut self, message: &str) -> Result<()> {
        writeln!(self.out, "{LOG_PREFIX}{message}").context("write step log")?;
        self.out.flush().context("flush step log")?;
        Ok(())
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

/// What to do with step failures once the sequence finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Exit 0 regardless of step outcomes.
    #[default]
    Permissive,
    /// Exit 1 if any executed step failed.
    Strict,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    pub name: &'static str,
    pub outcome: StepOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub executed: Vec<StepRecord>,
    pub interrupted: Option<i32>,
}

impl RunReport {
    pub fn failed_steps(&self) -> Vec<&'static str> {
        self.executed
            .iter()
            .filter(|record| record.outcome.is_failure())
            .map(|record| record.name)
            .collect()
    }

    pub fn exit_code(&self, policy: FailurePolicy) -> u8 {
        if let Some(signo) = self.interrupted {
            return u8::try_from(128 + signo).unwrap_or(u8::MAX);
        }
        match policy {
            FailurePolicy::Strict if !self.failed_steps().is_empty() => 1,
            _ => 0,
        }
    }
}

/// Run the selected steps in table order.
pub fn run_steps<E: Executor, W: Write>(
    selection: &Selection,
    config: &ResolvedConfig,
    executor: &mut E,
    log: &mut StepLog<W>,
) -> Result<RunReport> {
    for token in selection.unrecognized() {
        tracing::debug!(token, "unrecognized step ignored");
    }

    let mut report = RunReport::default();
    for step in STEPS {
        if let Some(signo) = executor.interrupted() {
            report.interrupted = Some(signo);
            break;
        }
        if !selection.includes(step.name) {
            continue;
        }

        let action = config.action_for(step);
        log.line(step.start_message)?;
        tracing::debug!(
            step = step.name,
            action = %action,
            overridden = config.is_overridden(step.name),
            "step start"
        );
        let outcome = executor.execute(&action);
        if let StepOutcome::Failed(failure) = &outcome {
            tracing::warn!(step = step.name, "step failed: {failure}");
        }
        log.line(DONE_MESSAGE)?;

        report.executed.push(StepRecord {
            name: step.name,
            outcome,
        });
    }
    if report.interrupted.is_none() {
        report.interrupted = executor.interrupted();
    }
    if let Some(signo) = report.interrupted {
        tracing::warn!(signal = signo, "interrupted; remaining steps skipped");
    }
    Ok(report)
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
