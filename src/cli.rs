//! CLI argument parsing for the step runner.
//!
//! Positional tokens are free text: unknown step names are accepted and simply
//! match nothing. Malformed flags are left to clap, which prints usage and
//! exits non-zero.
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "test-steps",
    version,
    about = "Run the test environment steps in their fixed order",
    after_help = "Steps (run in this order; all of them when none are named):\n  report-dir       Create the test report directory\n  build            Build the library (make)\n  containers:up    Build and start the test containers (docker-compose)\n  test             Run the test suite (yarn jest)\n  containers:down  Stop and remove the test containers, volumes, and images\n\nExamples:\n  test-steps\n  test-steps build test\n  test-steps --strict containers:up test containers:down"
)]
pub struct RootArgs {
    /// Steps to run
    #[arg(value_name = "STEPS")]
    pub steps: Vec<String>,

    /// Exit 1 if any executed step failed (the sequence still runs to the end)
    #[arg(long)]
    pub strict: bool,

    /// Print the step names in run order and exit
    #[arg(long)]
    pub list: bool,

    /// Config file overriding the report directory and step commands
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Emit debug diagnostics on stderr
    #[arg(long, short = 'v')]
    pub verbose: bool,
}
