//! Raw table normalization.
//!
//! Produces the canonical cleaned table: mapped column names, trimmed text,
//! uppercase tickers, lowercase everything else, ISO dates, parsed numbers
//! and a single missing sentinel. Per-record problems are recovered and
//! reported; only schema problems (and, in strict mode, bad dates) fail.

use crate::dates::DateParser;
use crate::reader::read_csv_path;
use crate::schema::{ColumnLayout, SchemaMap, Slot};
use std::collections::HashSet;
use std::path::Path;
use stockdash_core::{
    CleanRecord, CleanTable, Column, Error, IssueKind, NormalizerConfig, RawTable, Result,
    RowIssue,
};
use tracing::{debug, info, warn};

/// Summary of recovered per-record problems.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizationReport {
    /// Data rows processed.
    pub rows: usize,
    /// Recovered validation issues, in row order.
    pub issues: Vec<RowIssue>,
}

impl NormalizationReport {
    /// Number of recovered issues.
    pub fn issue_count(&self) -> usize {
        self.issues.len()
    }

    /// Number of distinct rows with at least one issue.
    pub fn rows_with_issues(&self) -> usize {
        self.issues.iter().map(|i| i.row).collect::<HashSet<_>>().len()
    }

    /// Issues of one kind.
    pub fn count(&self, kind: IssueKind) -> usize {
        self.issues.iter().filter(|i| i.kind == kind).count()
    }

    /// Whether every row normalized cleanly.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Normalization output.
#[derive(Debug, Clone)]
pub struct Normalized {
    pub table: CleanTable,
    pub report: NormalizationReport,
}

/// Converts raw tables into the canonical cleaned form.
pub struct Normalizer {
    schema: SchemaMap,
    dates: DateParser,
    /// Lowercased missing-value tokens.
    missing: HashSet<String>,
    strict_dates: bool,
}

impl Normalizer {
    /// Create a normalizer with the default schema map.
    pub fn new(config: &NormalizerConfig) -> Self {
        Self::with_schema(config, SchemaMap::default())
    }

    /// Create a normalizer with a custom schema map.
    pub fn with_schema(config: &NormalizerConfig, schema: SchemaMap) -> Self {
        Self {
            schema,
            dates: DateParser::new(&config.date_formats),
            missing: config
                .missing_tokens
                .iter()
                .map(|t| t.trim().to_lowercase())
                .collect(),
            strict_dates: config.strict_dates,
        }
    }

    /// Normalize a raw table. The input is not modified.
    pub fn normalize(&self, raw: &RawTable) -> Result<Normalized> {
        let layout = self.schema.resolve(&raw.headers)?;
        debug!(columns = ?layout.columns(), "resolved column layout");

        let mut report = NormalizationReport {
            rows: raw.len(),
            issues: Vec::new(),
        };
        let mut records = Vec::with_capacity(raw.len());

        for (row_idx, row) in raw.rows.iter().enumerate() {
            let record = self.normalize_row(row_idx, row, &layout, &mut report.issues)?;
            records.push(record);
        }

        if report.is_clean() {
            info!(rows = report.rows, "normalized table");
        } else {
            for issue in &report.issues {
                warn!(%issue, "recovered row issue");
            }
            warn!(
                rows = report.rows,
                issues = report.issue_count(),
                affected_rows = report.rows_with_issues(),
                "normalized table with recovered issues"
            );
        }

        Ok(Normalized {
            table: CleanTable::new(layout.columns(), records),
            report,
        })
    }

    fn normalize_row(
        &self,
        row_idx: usize,
        row: &[String],
        layout: &ColumnLayout,
        issues: &mut Vec<RowIssue>,
    ) -> Result<CleanRecord> {
        let mut record = CleanRecord::default();

        for (slot, cell) in layout.slots.iter().zip(row.iter()) {
            let value = self.clean_text(cell);

            match slot {
                Slot::Canonical(Column::Date) => {
                    record.date = match value {
                        None => None,
                        Some(text) => match self.dates.parse(&text) {
                            Some(date) => Some(date),
                            None if self.strict_dates => {
                                return Err(Error::validation(format!(
                                    "row {}: cannot parse date {:?}",
                                    row_idx, text
                                )));
                            }
                            None => {
                                issues.push(issue(
                                    row_idx,
                                    Column::Date,
                                    text,
                                    IssueKind::InvalidDate,
                                ));
                                None
                            }
                        },
                    };
                }
                Slot::Canonical(column) if column.is_numeric() => {
                    let number = match value {
                        None => None,
                        Some(text) => match parse_number(&text) {
                            Ok(v) => Some(v),
                            Err(kind) => {
                                issues.push(issue(row_idx, *column, text, kind));
                                None
                            }
                        },
                    };
                    match column {
                        Column::Open => record.open = number,
                        Column::High => record.high = number,
                        Column::Low => record.low = number,
                        Column::Close => record.close = number,
                        _ => record.volume = number,
                    }
                }
                Slot::Canonical(column) => {
                    let text = value.map(|v| case_fold(slot, v));
                    match column {
                        Column::Ticker => record.ticker = text,
                        Column::Sector => record.sector = text,
                        Column::Exchange => record.exchange = text,
                        Column::Notes => record.notes = text,
                        _ => record.validated = text,
                    }
                }
                Slot::Extra(name) => {
                    let text = value.map(|v| case_fold(slot, v));
                    record.extra.insert(name.clone(), text);
                }
            }
        }

        Ok(record)
    }

    /// Trim a cell and map missing tokens to `None`.
    fn clean_text(&self, cell: &str) -> Option<String> {
        let trimmed = cell.trim();
        if self.missing.contains(&trimmed.to_lowercase()) {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(&NormalizerConfig::default())
    }
}

/// Load a CSV file and normalize it.
pub fn load_clean_table(path: impl AsRef<Path>, config: &NormalizerConfig) -> Result<Normalized> {
    let raw = read_csv_path(path)?;
    Normalizer::new(config).normalize(&raw)
}

fn case_fold(slot: &Slot, text: String) -> String {
    if slot.is_ticker() {
        text.to_uppercase()
    } else {
        text.to_lowercase()
    }
}

fn issue(row: usize, column: Column, value: String, kind: IssueKind) -> RowIssue {
    RowIssue {
        row,
        column: column.name().to_string(),
        value,
        kind,
    }
}

/// Parse a price or volume. Thousands separators and a leading currency
/// sign are tolerated; negative or non-finite values are rejected.
fn parse_number(text: &str) -> std::result::Result<f64, IssueKind> {
    let cleaned: String = text
        .trim_start_matches('$')
        .chars()
        .filter(|&c| c != ',' && c != '_')
        .collect();
    let value: f64 = cleaned.trim().parse().map_err(|_| IssueKind::InvalidNumber)?;
    if !value.is_finite() || value < 0.0 {
        return Err(IssueKind::OutOfRange);
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use std::sync::{Arc, Mutex};

    fn scenario_table() -> RawTable {
        RawTable::from_strs(
            &["Date", "Ticker", "Sector", "Open", "Close", "Volume"],
            &[&[" 2023-01-05 ", " aapl ", "Tech", "150.0", "152.0", "1000000"]],
        )
    }

    #[test]
    fn test_scenario_row() {
        let out = Normalizer::default().normalize(&scenario_table()).unwrap();
        assert_eq!(
            out.table.columns,
            vec!["date", "ticker", "sector", "open", "close", "volume"]
        );

        let r = &out.table.records[0];
        assert_eq!(r.date, NaiveDate::from_ymd_opt(2023, 1, 5));
        assert_eq!(r.ticker.as_deref(), Some("AAPL"));
        assert_eq!(r.sector.as_deref(), Some("tech"));
        assert_eq!(r.open, Some(150.0));
        assert_eq!(r.close, Some(152.0));
        assert_eq!(r.volume, Some(1_000_000.0));
        assert!(out.report.is_clean());
    }

    #[test]
    fn test_column_names_are_snake_case() {
        let raw = RawTable::from_strs(
            &["Trade Date", "TICKER", "Exchange Name", "Close Price", "Analyst Notes "],
            &[&["2023-01-05", "msft", "NASDAQ", "10", "x"]],
        );
        let out = Normalizer::default().normalize(&raw).unwrap();
        for column in &out.table.columns {
            assert!(column
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'));
        }
        assert_eq!(
            out.table.columns,
            vec!["date", "ticker", "exchange_name", "close", "analyst_notes"]
        );
    }

    #[test]
    fn test_text_case_and_whitespace() {
        let raw = RawTable::from_strs(
            &["date", "ticker", "exchange", "notes", "Peer Ticker", "Currency"],
            &[&["2023-01-05", " brk.b", " NYSE ", "  Gap Up  ", " spy ", " USD "]],
        );
        let out = Normalizer::default().normalize(&raw).unwrap();
        let r = &out.table.records[0];
        assert_eq!(r.ticker.as_deref(), Some("BRK.B"));
        assert_eq!(r.exchange.as_deref(), Some("nyse"));
        assert_eq!(r.notes.as_deref(), Some("gap up"));
        assert_eq!(r.extra["peer_ticker"].as_deref(), Some("SPY"));
        assert_eq!(r.extra["currency"].as_deref(), Some("usd"));
    }

    #[test]
    fn test_missing_tokens_become_none() {
        let raw = RawTable::from_strs(
            &["date", "ticker", "sector", "close", "notes", "currency"],
            &[&["2023-01-05", "aapl", "N/A", "-", " null ", "NONE"]],
        );
        let out = Normalizer::default().normalize(&raw).unwrap();
        let r = &out.table.records[0];
        assert_eq!(r.sector, None);
        assert_eq!(r.close, None);
        assert_eq!(r.notes, None);
        assert_eq!(r.extra["currency"], None);
        // Missing is not a validation problem.
        assert!(out.report.is_clean());
    }

    #[test]
    fn test_bad_date_is_recovered() {
        let raw = RawTable::from_strs(
            &["date", "ticker", "close"],
            &[&["not-a-date", "aapl", "1"], &["2023-01-06", "aapl", "2"]],
        );
        let out = Normalizer::default().normalize(&raw).unwrap();
        assert_eq!(out.table.records[0].date, None);
        assert_eq!(out.table.records[0].close, Some(1.0));
        assert!(out.table.records[1].date.is_some());
        assert_eq!(out.report.count(IssueKind::InvalidDate), 1);
        assert_eq!(out.report.issues[0].row, 0);
        assert_eq!(out.report.issues[0].value, "not-a-date");
    }

    #[test]
    fn test_bad_date_strict_mode_fails() {
        let config = NormalizerConfig {
            strict_dates: true,
            ..Default::default()
        };
        let raw = RawTable::from_strs(&["date", "ticker"], &[&["not-a-date", "aapl"]]);
        let err = Normalizer::new(&config).normalize(&raw).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_numbers() {
        let raw = RawTable::from_strs(
            &["date", "ticker", "open", "close", "volume", "high"],
            &[&["2023-01-05", "aapl", "$1,234.50", "abc", "-5", "1e3"]],
        );
        let out = Normalizer::default().normalize(&raw).unwrap();
        let r = &out.table.records[0];
        assert_relative_eq!(r.open.unwrap(), 1234.5);
        assert_eq!(r.close, None);
        assert_eq!(r.volume, None);
        assert_relative_eq!(r.high.unwrap(), 1000.0);
        assert_eq!(out.report.count(IssueKind::InvalidNumber), 1);
        assert_eq!(out.report.count(IssueKind::OutOfRange), 1);
        assert_eq!(out.report.rows_with_issues(), 1);
    }

    #[test]
    fn test_missing_required_column_fails() {
        let raw = RawTable::from_strs(&["Date", "Close"], &[&["2023-01-05", "1"]]);
        let err = Normalizer::default().normalize(&raw).unwrap_err();
        assert!(matches!(err, Error::Schema(_)));
    }

    #[test]
    fn test_input_not_mutated() {
        let raw = scenario_table();
        let before = raw.clone();
        Normalizer::default().normalize(&raw).unwrap();
        assert_eq!(raw, before);
    }

    #[test]
    fn test_idempotent() {
        let raw = RawTable::from_strs(
            &[
                "Trade Date",
                " Ticker",
                "Sector",
                "Exchange",
                "Open Price",
                "Close Price",
                "Volume",
                "Notes",
                "Validated",
                "Currency",
            ],
            &[
                &[
                    "01/05/2023", " aapl ", "Tech", "NASDAQ", "150.10", "152.0", "1,000,000",
                    "Gap Up", "YES", "usd",
                ],
                &["not-a-date", "msft", "NA", "nyse", "abc", "300.5", "", "", "no", ""],
                &[
                    "2023-01-06", "goog", "Tech", "", "99.999", "100", "12", "earnings beat", "y",
                    "EUR",
                ],
            ],
        );
        let normalizer = Normalizer::default();
        let once = normalizer.normalize(&raw).unwrap();
        let twice = normalizer.normalize(&once.table.to_raw()).unwrap();
        assert_eq!(once.table, twice.table);
        assert!(twice.report.is_clean());
    }

    #[test]
    fn test_empty_table() {
        let raw = RawTable::from_strs(&["date", "ticker"], &[]);
        let out = Normalizer::default().normalize(&raw).unwrap();
        assert!(out.table.is_empty());
        assert_eq!(out.table.columns, vec!["date", "ticker"]);
    }

    /// Shared buffer capturing formatted log output.
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_row_issues_logged_as_warnings() {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let raw = RawTable::from_strs(
            &["date", "ticker", "close"],
            &[&["not-a-date", "aapl", "1"], &["2023-01-06", "aapl", "abc"]],
        );
        tracing::subscriber::with_default(subscriber, || {
            Normalizer::default().normalize(&raw).unwrap();
        });

        let text = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        let issue_lines: Vec<_> = text
            .lines()
            .filter(|l| l.contains("recovered row issue"))
            .collect();
        assert_eq!(issue_lines.len(), 2, "{text}");
        assert!(issue_lines.iter().all(|l| l.contains("WARN")));
        assert!(issue_lines[0].contains("not-a-date"));
        assert!(issue_lines[1].contains("abc"));
        assert!(text.contains("normalized table with recovered issues"));
    }
}
