//! CSV loading into raw tables.

use std::borrow::Cow;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use stockdash_core::{RawTable, Result};
use tracing::{debug, info, warn};

/// Read a delimited file into a raw table.
pub fn read_csv_path(path: impl AsRef<Path>) -> Result<RawTable> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let table = read_csv(file)?;
    info!(
        path = %path.display(),
        rows = table.len(),
        columns = table.headers.len(),
        "loaded raw table"
    );
    Ok(table)
}

/// Read CSV data into a raw table.
///
/// Cells are kept verbatim (no trimming). Rows shorter than the header are
/// padded with empty cells; surplus cells are dropped. Bytes that are not
/// valid UTF-8 are replaced with U+FFFD so one badly encoded cell does not
/// fail the load.
pub fn read_csv<R: Read>(reader: R) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::None)
        .from_reader(reader);

    let mut lossy = 0usize;
    let mut decode = |cell: &[u8]| match String::from_utf8_lossy(cell) {
        Cow::Borrowed(text) => text.to_string(),
        Cow::Owned(text) => {
            lossy += 1;
            text
        }
    };

    let headers: Vec<String> = reader.byte_headers()?.iter().map(&mut decode).collect();
    let width = headers.len();
    let mut rows = Vec::new();
    let mut truncated = 0usize;

    for result in reader.byte_records() {
        let record = result?;
        if record.len() > width {
            truncated += 1;
        }
        // Fully blank lines carry no data.
        if record.iter().all(|c| c.iter().all(u8::is_ascii_whitespace)) {
            debug!(line = record.position().map(|p| p.line()), "skipping blank row");
            continue;
        }
        rows.push(record.iter().take(width).map(&mut decode).collect());
    }

    if truncated > 0 {
        warn!(rows = truncated, "dropped cells beyond the header width");
    }
    if lossy > 0 {
        warn!(cells = lossy, "replaced invalid UTF-8 in cells");
    }

    Ok(RawTable::new(headers, rows))
}
