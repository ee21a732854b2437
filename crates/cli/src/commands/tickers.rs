//! List ticker symbols.

use anyhow::Result;
use std::io::{self, Write};
use stockdash_core::{CleanTable, Config};

use crate::cli::TickersArgs;

use super::load_input;

pub fn run(args: &TickersArgs, config: &Config) -> Result<()> {
    let normalized = load_input(&args.input, &config.normalizer)?;
    write_tickers(&normalized.table, io::stdout().lock())
}

/// One symbol per line, sorted.
fn write_tickers<W: Write>(table: &CleanTable, mut out: W) -> Result<()> {
    for ticker in table.tickers() {
        writeln!(out, "{ticker}")?;
    }
    Ok(())
}
