mod aggregate;
mod clean;
mod tickers;

use anyhow::{Context, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use stockdash_core::{Config, NormalizerConfig};
use stockdash_ingestion::{load_clean_table, Normalized};

use crate::cli::{Cli, Command};

/// Exit status when the input file cannot be read or normalized.
pub const EXIT_INPUT: u8 = 1;
/// Exit status for configuration and output failures.
pub const EXIT_OTHER: u8 = 2;

/// Context marking a failure to load the source file.
#[derive(Debug)]
pub struct InputFailed {
    path: PathBuf,
}

impl fmt::Display for InputFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "input failed to load: {}", self.path.display())
    }
}

pub fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;

    match &cli.command {
        Command::Clean(args) => clean::run(args, &config),
        Command::Aggregate(args) => aggregate::run(args, &config),
        Command::Tickers(args) => tickers::run(args, &config),
    }
}

/// Process exit status for a failed command.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    if err.downcast_ref::<InputFailed>().is_some() {
        EXIT_INPUT
    } else {
        EXIT_OTHER
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::from_json_file(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(Config::default()),
    }
}

fn load_input(path: &Path, config: &NormalizerConfig) -> Result<Normalized> {
    load_clean_table(path, config).with_context(|| InputFailed {
        path: path.to_path_buf(),
    })
}
