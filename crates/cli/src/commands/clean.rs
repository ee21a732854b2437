//! Normalize a raw CSV and save the cleaned table.

use anyhow::{Context, Result};
use stockdash_core::Config;
use stockdash_ingestion::write_clean_csv_path;

use crate::cli::CleanArgs;

use super::load_input;

pub fn run(args: &CleanArgs, config: &Config) -> Result<()> {
    let normalized = load_input(&args.input, &config.normalizer)?;
    write_clean_csv_path(&normalized.table, &args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    Ok(())
}
