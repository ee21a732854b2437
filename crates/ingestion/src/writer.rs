//! Writing cleaned tables to CSV.

use std::fs::File;
use std::io::Write;
use std::path::Path;
use stockdash_core::{CleanTable, Result};
use tracing::info;

/// Write a cleaned table as CSV. Missing values become empty cells.
pub fn write_clean_csv<W: Write>(table: &CleanTable, writer: W) -> Result<()> {
    let raw = table.to_raw();
    let mut writer = csv::Writer::from_writer(writer);

    writer.write_record(&raw.headers)?;
    for row in &raw.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write a cleaned table to a CSV file.
pub fn write_clean_csv_path(table: &CleanTable, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_clean_csv(table, file)?;
    info!(path = %path.display(), rows = table.len(), "saved cleaned table");
    Ok(())
}
