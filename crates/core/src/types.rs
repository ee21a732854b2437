//! Core data types for the stockdash pipeline.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Calendar date format used by cleaned tables.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw tabular input. Every cell is an unparsed string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    /// Column names exactly as read.
    pub headers: Vec<String>,
    /// Data rows, each padded to `headers.len()`.
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Create a raw table, padding short rows with empty cells.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                if row.len() < width {
                    row.resize(width, String::new());
                }
                row
            })
            .collect();
        Self { headers, rows }
    }

    /// Convenience constructor from string slices.
    pub fn from_strs(headers: &[&str], rows: &[&[&str]]) -> Self {
        Self::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Canonical column of a cleaned table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    Date,
    Ticker,
    Sector,
    Exchange,
    Open,
    High,
    Low,
    Close,
    Volume,
    Notes,
    Validated,
}

impl Column {
    /// All canonical columns.
    pub const ALL: [Column; 11] = [
        Column::Date,
        Column::Ticker,
        Column::Sector,
        Column::Exchange,
        Column::Open,
        Column::High,
        Column::Low,
        Column::Close,
        Column::Volume,
        Column::Notes,
        Column::Validated,
    ];

    /// Canonical (lowercase, underscore) name.
    pub fn name(self) -> &'static str {
        match self {
            Column::Date => "date",
            Column::Ticker => "ticker",
            Column::Sector => "sector",
            Column::Exchange => "exchange",
            Column::Open => "open",
            Column::High => "high",
            Column::Low => "low",
            Column::Close => "close",
            Column::Volume => "volume",
            Column::Notes => "notes",
            Column::Validated => "validated",
        }
    }

    /// Look up a column by its canonical name.
    pub fn from_name(name: &str) -> Option<Column> {
        Column::ALL.iter().copied().find(|c| c.name() == name)
    }

    /// Whether the column holds a price or volume.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            Column::Open | Column::High | Column::Low | Column::Close | Column::Volume
        )
    }

    /// Whether the column must be present in every input.
    pub fn is_required(self) -> bool {
        matches!(self, Column::Date | Column::Ticker)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One cleaned row. `None` is the only representation of a missing value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CleanRecord {
    pub date: Option<NaiveDate>,
    /// Uppercase ticker symbol.
    pub ticker: Option<String>,
    pub sector: Option<String>,
    pub exchange: Option<String>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<f64>,
    pub notes: Option<String>,
    pub validated: Option<String>,
    /// Columns outside the schema map, keyed by snake_case name.
    pub extra: BTreeMap<String, Option<String>>,
}

impl CleanRecord {
    /// Whether both open and close are present.
    pub fn has_prices(&self) -> bool {
        self.open.is_some() && self.close.is_some()
    }

    /// Intraday change: close - open.
    pub fn price_change(&self) -> Option<f64> {
        Some(self.close? - self.open?)
    }

    /// Whether the validated flag reads as affirmative.
    pub fn is_validated(&self) -> bool {
        matches!(
            self.validated.as_deref(),
            Some("yes") | Some("y") | Some("true") | Some("1")
        )
    }

    /// Render one cell back to its textual form (empty when missing).
    pub fn cell(&self, column: &str) -> String {
        fn num(v: Option<f64>) -> String {
            v.map(|v| v.to_string()).unwrap_or_default()
        }
        fn text(v: &Option<String>) -> String {
            v.clone().unwrap_or_default()
        }

        match Column::from_name(column) {
            Some(Column::Date) => self
                .date
                .map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            Some(Column::Ticker) => text(&self.ticker),
            Some(Column::Sector) => text(&self.sector),
            Some(Column::Exchange) => text(&self.exchange),
            Some(Column::Open) => num(self.open),
            Some(Column::High) => num(self.high),
            Some(Column::Low) => num(self.low),
            Some(Column::Close) => num(self.close),
            Some(Column::Volume) => num(self.volume),
            Some(Column::Notes) => text(&self.notes),
            Some(Column::Validated) => text(&self.validated),
            None => self.extra.get(column).cloned().flatten().unwrap_or_default(),
        }
    }
}

/// The cleaned, canonical table held in memory for a session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanTable {
    /// Canonical or snake_case column names in input order.
    pub columns: Vec<String>,
    pub records: Vec<CleanRecord>,
}

impl CleanTable {
    pub fn new(columns: Vec<String>, records: Vec<CleanRecord>) -> Self {
        Self { columns, records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct ticker symbols, alphabetically.
    pub fn tickers(&self) -> Vec<String> {
        self.records
            .iter()
            .filter_map(|r| r.ticker.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Render back into a raw table (ISO dates, round-trip numbers, empty
    /// cells for missing values).
    pub fn to_raw(&self) -> RawTable {
        let rows = self
            .records
            .iter()
            .map(|r| self.columns.iter().map(|c| r.cell(c)).collect())
            .collect();
        RawTable::new(self.columns.clone(), rows)
    }
}

/// Explicit ticker selection passed into every aggregation call.
///
/// A filter and its [`complement`](TickerFilter::complement) together admit
/// every record exactly once, including records without a ticker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TickerFilter {
    /// Every record.
    #[default]
    All,
    /// Records whose ticker is in the set. An empty set selects nothing.
    Only(BTreeSet<String>),
    /// Records whose ticker is not in the set, and records without a ticker.
    Except(BTreeSet<String>),
}

impl TickerFilter {
    /// Select every ticker.
    pub fn all() -> Self {
        TickerFilter::All
    }

    /// Select only the given symbols (trimmed, uppercased, blanks dropped).
    /// No symbols means all tickers.
    pub fn only<I, S>(tickers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tickers: BTreeSet<String> = tickers
            .into_iter()
            .map(|t| t.as_ref().trim().to_uppercase())
            .filter(|t| !t.is_empty())
            .collect();
        if tickers.is_empty() {
            TickerFilter::All
        } else {
            TickerFilter::Only(tickers)
        }
    }

    /// Select nothing.
    pub fn none() -> Self {
        TickerFilter::Only(BTreeSet::new())
    }

    /// Filter admitting exactly the records this one rejects.
    pub fn complement(&self) -> Self {
        match self {
            TickerFilter::All => Self::none(),
            TickerFilter::Only(set) => TickerFilter::Except(set.clone()),
            TickerFilter::Except(set) => TickerFilter::Only(set.clone()),
        }
    }

    /// Whether every ticker is selected.
    pub fn is_all(&self) -> bool {
        matches!(self, TickerFilter::All)
    }

    /// Whether a record passes the filter.
    pub fn matches(&self, record: &CleanRecord) -> bool {
        match (self, record.ticker.as_deref()) {
            (TickerFilter::All, _) => true,
            (TickerFilter::Only(set), Some(ticker)) => set.contains(ticker),
            (TickerFilter::Only(_), None) => false,
            (TickerFilter::Except(set), Some(ticker)) => !set.contains(ticker),
            (TickerFilter::Except(_), None) => true,
        }
    }
}

/// Sign of a price gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GapDirection {
    /// Open above the previous close by more than the threshold.
    Up,
    /// Open below the previous close by more than the threshold.
    Down,
    /// Difference within the threshold.
    Flat,
}

/// Gap between a record's open and the previous trading day's close for the
/// same ticker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Gap {
    /// open - prev_close.
    pub value: f64,
    /// value / prev_close (0 when prev_close is 0).
    pub pct: f64,
    pub direction: GapDirection,
}

impl Gap {
    /// Whether the gap counts as a gap event.
    pub fn is_event(&self) -> bool {
        self.direction != GapDirection::Flat
    }
}

/// Daily view row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyRow {
    pub date: NaiveDate,
    pub record_count: usize,
    pub avg_open: Option<f64>,
    pub avg_close: Option<f64>,
    pub total_volume: f64,
    /// Mean of open - previous close over records with a computable gap.
    pub avg_gap: Option<f64>,
    pub gap_up_count: usize,
    pub gap_down_count: usize,
    pub missing_open: usize,
    pub missing_close: usize,
}

/// Weekly view row, keyed by ISO week.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyRow {
    pub iso_year: i32,
    pub iso_week: u32,
    /// Monday of the ISO week.
    pub week_start: NaiveDate,
    pub record_count: usize,
    pub avg_close: Option<f64>,
    pub total_volume: f64,
    pub avg_volume: Option<f64>,
    pub volatility: Option<f64>,
}

/// Ticker view row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickerRow {
    pub ticker: String,
    pub record_count: usize,
    pub avg_open: Option<f64>,
    /// Mean closing price; this is the ticker's mean price.
    pub avg_close: Option<f64>,
    pub avg_volume: Option<f64>,
    /// Last close minus first close in date order.
    pub net_change: Option<f64>,
    /// Mean of close - open.
    pub avg_price_change: Option<f64>,
    pub validated_count: usize,
    pub gap_up_count: usize,
    pub gap_down_count: usize,
    pub gap_events: usize,
}

impl TickerRow {
    /// Mean price over the ticker's records (mean close).
    pub fn mean_price(&self) -> Option<f64> {
        self.avg_close
    }
}

/// Sector view row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectorRow {
    pub sector: String,
    pub record_count: usize,
    pub avg_open: Option<f64>,
    /// Mean closing price; this is the sector's mean price.
    pub avg_close: Option<f64>,
    pub total_volume: f64,
    pub gap_up_count: usize,
    pub gap_down_count: usize,
    pub gap_events: usize,
}

/// Exchange view row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExchangeRow {
    pub exchange: String,
    pub country: String,
    pub record_count: usize,
    pub avg_open: Option<f64>,
    pub avg_close: Option<f64>,
    pub total_volume: f64,
    pub gap_up_count: usize,
    pub gap_down_count: usize,
    pub gap_events: usize,
}

/// Notes view row, keyed by note category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoteRow {
    pub category: String,
    pub count: usize,
    pub ticker_count: usize,
    pub avg_price_change: Option<f64>,
    pub avg_volume: Option<f64>,
    pub total_volume: f64,
}

/// Record counts behind one aggregation call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    /// Records in the cleaned table.
    pub records_total: usize,
    /// Records passing the ticker filter.
    pub records_selected: usize,
    /// Selected records without a date (excluded from daily/weekly/gaps).
    pub without_date: usize,
    /// Selected records without a ticker (excluded from the ticker view).
    pub without_ticker: usize,
    /// Selected records without a sector.
    pub without_sector: usize,
    /// Selected records without an exchange.
    pub without_exchange: usize,
    /// Selected records without notes.
    pub without_notes: usize,
    /// Selected records lacking open or close.
    pub without_prices: usize,
}

/// The six aggregation views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Daily,
    Weekly,
    Ticker,
    Sector,
    Exchange,
    Notes,
}

impl View {
    pub const ALL: [View; 6] = [
        View::Daily,
        View::Weekly,
        View::Ticker,
        View::Sector,
        View::Exchange,
        View::Notes,
    ];

    pub fn name(self) -> &'static str {
        match self {
            View::Daily => "daily",
            View::Weekly => "weekly",
            View::Ticker => "ticker",
            View::Sector => "sector",
            View::Exchange => "exchange",
            View::Notes => "notes",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// All six views for one (table, filter) pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregationSet {
    pub daily: Vec<DailyRow>,
    pub weekly: Vec<WeeklyRow>,
    pub tickers: Vec<TickerRow>,
    pub sectors: Vec<SectorRow>,
    pub exchanges: Vec<ExchangeRow>,
    pub notes: Vec<NoteRow>,
    pub diagnostics: Diagnostics,
}

impl AggregationSet {
    /// Number of rows in one view.
    pub fn view_len(&self, view: View) -> usize {
        match view {
            View::Daily => self.daily.len(),
            View::Weekly => self.weekly.len(),
            View::Ticker => self.tickers.len(),
            View::Sector => self.sectors.len(),
            View::Exchange => self.exchanges.len(),
            View::Notes => self.notes.len(),
        }
    }

    /// Whether every view is empty.
    pub fn is_empty(&self) -> bool {
        View::ALL.iter().all(|&v| self.view_len(v) == 0)
    }
}
