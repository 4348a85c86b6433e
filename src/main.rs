use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

mod cli;
mod config;
mod exec;
mod logging;
mod runner;
mod selection;
mod signals;
mod steps;

use cli::RootArgs;
use exec::SystemExecutor;
use runner::{FailurePolicy, StepLog};
use selection::Selection;

fn main() -> Result<ExitCode> {
    let args = RootArgs::parse();
    logging::init(args.verbose);

    if args.list {
        return cmd_list();
    }
    cmd_run(args)
}

fn cmd_list() -> Result<ExitCode> {
    let mut stdout = io::stdout().lock();
    for step in steps::STEPS {
        writeln!(stdout, "{}", step.name).context("write step list")?;
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_run(args: RootArgs) -> Result<ExitCode> {
    let config_path = args
        .config
        .or_else(|| std::env::var_os(config::CONFIG_ENV).map(PathBuf::from));
    let config = config::load_config(config_path.as_deref())?;

    let policy = if args.strict {
        FailurePolicy::Strict
    } else {
        FailurePolicy::Permissive
    };
    let selection = Selection::from_tokens(args.steps);

    let _signals = signals::install();
    let mut executor = SystemExecutor::new();
    let mut log = StepLog::new(io::stdout());
    let report = runner::run_steps(&selection, &config, &mut executor, &mut log)?;

    let failed = report.failed_steps();
    if !failed.is_empty() {
        tracing::warn!(
            strict = args.strict,
            "{} step(s) failed: {}",
            failed.len(),
            failed.join(", ")
        );
    }
    Ok(ExitCode::from(report.exit_code(policy)))
}
