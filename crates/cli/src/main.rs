mod cli;
mod commands;

use clap::Parser;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::Cli;

fn main() -> ExitCode {
    init_logging();

    let cli = Cli::parse();
    match commands::run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::from(commands::exit_code(&err))
        }
    }
}

/// Log to stderr, filtered by `RUST_LOG` (default `info`).
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
