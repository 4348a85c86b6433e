//! Optional step configuration.
//!
//! A JSON file, named only through `--config` or `TEST_STEPS_CONFIG`, can move
//! the report directory and replace the commands behind command-backed steps.
//! Nothing is read implicitly from the working directory, so a bare run always
//! uses the built-in table. Step names, order, and log messages never change.
use crate::steps::{self, Action, Step, DEFAULT_REPORT_DIR};
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment fallback for `--config`.
pub const CONFIG_ENV: &str = "TEST_STEPS_CONFIG";

/// On-disk config shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StepsConfig {
    #[serde(default)]
    pub report_dir: Option<PathBuf>,
    /// Step name to command lines, split with shell-words and chained with `&&`.
    #[serde(default)]
    pub commands: BTreeMap<String, Vec<String>>,
}

/// Validated config with command lines already split into argv.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub report_dir: PathBuf,
    overrides: BTreeMap<&'static str, Vec<Vec<String>>>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            report_dir: PathBuf::from(DEFAULT_REPORT_DIR),
            overrides: BTreeMap::new(),
        }
    }
}

impl ResolvedConfig {
    pub fn action_for(&self, step: &Step) -> Action {
        match self.overrides.get(step.name) {
            Some(commands) => Action::Commands(commands.clone()),
            None => Action::from_default(step.default_action, &self.report_dir),
        }
    }

    pub fn is_overridden(&self, name: &str) -> bool {
        self.overrides.contains_key(name)
    }
}

impl StepsConfig {
    /// Check step names and split command lines.
    pub fn resolve(self) -> Result<ResolvedConfig> {
        let report_dir = match self.report_dir {
            Some(dir) if dir.as_os_str().is_empty() => {
                return Err(anyhow!("report_dir must be non-empty"));
            }
            Some(dir) => dir,
            None => PathBuf::from(DEFAULT_REPORT_DIR),
        };

        let mut overrides = BTreeMap::new();
        for (name, lines) in self.commands {
            let step = steps::find_step(&name)
                .ok_or_else(|| anyhow!("commands: unknown step {name:?}"))?;
            if !step.accepts_command_override() {
                return Err(anyhow!("commands: step {name:?} does not run commands"));
            }
            if lines.is_empty() {
                return Err(anyhow!("commands.{name}: at least one command is required"));
            }
            let mut argvs = Vec::with_capacity(lines.len());
            for line in &lines {
                let argv = shell_words::split(line)
                    .with_context(|| format!("commands.{name}: parse {line:?}"))?;
                if argv.is_empty() {
                    return Err(anyhow!("commands.{name}: empty command line"));
                }
                argvs.push(argv);
            }
            overrides.insert(step.name, argvs);
        }

        Ok(ResolvedConfig {
            report_dir,
            overrides,
        })
    }
}

pub fn read_config(path: &Path) -> Result<StepsConfig> {
    let bytes = fs::read(path).with_context(|| format!("read config {}", path.display()))?;
    let config: StepsConfig = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse config JSON {}", path.display()))?;
    Ok(config)
}

/// Load and resolve the config named for this invocation, if any.
pub fn load_config(path: Option<&Path>) -> Result<ResolvedConfig> {
    let Some(path) = path else {
        return Ok(ResolvedConfig::default());
    };
    let resolved = read_config(path)?
        .resolve()
        .with_context(|| format!("invalid config {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        report_dir = %resolved.report_dir.display(),
        overrides = resolved.overrides.len(),
        "config loaded"
    );
    Ok(resolved)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
