//! Column-name mapping onto the canonical schema.
//!
//! Headers are first reduced to snake_case, then looked up in an explicit
//! synonym table. Anything unmapped is carried as an extra column under its
//! snake_case name.

use std::collections::{HashMap, HashSet};
use stockdash_core::{Column, Error, Result};

/// Reduce a header to lowercase-with-underscores.
///
/// Strips a UTF-8 BOM, splits camelCase words, replaces every run of
/// non-alphanumeric characters with a single underscore and trims
/// underscores at both ends.
pub fn to_snake_case(name: &str) -> String {
    let name = name.trim().trim_start_matches('\u{feff}');
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev: Option<char> = None;

    for c in name.chars() {
        if c.is_alphanumeric() {
            if c.is_uppercase() {
                if let Some(p) = prev {
                    if p.is_lowercase() || p.is_ascii_digit() {
                        out.push('_');
                    }
                }
            }
            out.extend(c.to_lowercase());
        } else if !out.ends_with('_') && !out.is_empty() {
            out.push('_');
        }
        prev = Some(c);
    }

    out.trim_end_matches('_').to_string()
}

/// Where a raw column lands in the cleaned table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    /// One of the canonical columns.
    Canonical(Column),
    /// An unmapped column, keyed by its snake_case name.
    Extra(String),
}

impl Slot {
    /// Column name in the cleaned table.
    pub fn name(&self) -> &str {
        match self {
            Slot::Canonical(c) => c.name(),
            Slot::Extra(name) => name,
        }
    }

    /// Whether values in this slot are ticker symbols (uppercased).
    pub fn is_ticker(&self) -> bool {
        match self {
            Slot::Canonical(c) => *c == Column::Ticker,
            Slot::Extra(name) => name.contains("ticker"),
        }
    }
}

/// Resolved mapping from raw column positions to cleaned columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    /// One slot per raw column, in input order.
    pub slots: Vec<Slot>,
}

impl ColumnLayout {
    /// Cleaned column names in input order.
    pub fn columns(&self) -> Vec<String> {
        self.slots.iter().map(|s| s.name().to_string()).collect()
    }

    /// Position of a canonical column in the raw row.
    pub fn position(&self, column: Column) -> Option<usize> {
        self.slots.iter().position(|s| *s == Slot::Canonical(column))
    }
}

/// Declared synonyms (snake_case) for each canonical column.
#[derive(Debug, Clone)]
pub struct SchemaMap {
    lookup: HashMap<String, Column>,
}

impl SchemaMap {
    /// Create an empty map where only canonical names resolve.
    pub fn canonical_only() -> Self {
        let lookup = Column::ALL
            .iter()
            .map(|&c| (c.name().to_string(), c))
            .collect();
        Self { lookup }
    }

    /// Add a synonym for a canonical column. The name is reduced to
    /// snake_case first.
    pub fn with_synonym(mut self, column: Column, synonym: &str) -> Self {
        self.lookup.insert(to_snake_case(synonym), column);
        self
    }

    fn with_synonyms(self, column: Column, synonyms: &[&str]) -> Self {
        synonyms
            .iter()
            .fold(self, |map, s| map.with_synonym(column, s))
    }

    /// Canonical column for a raw header, if any.
    pub fn lookup(&self, header: &str) -> Option<Column> {
        self.lookup.get(&to_snake_case(header)).copied()
    }

    /// Resolve raw headers into a layout.
    ///
    /// Fails with a schema error when a required column is absent or when
    /// two headers map to the same cleaned column.
    pub fn resolve(&self, headers: &[String]) -> Result<ColumnLayout> {
        let mut slots = Vec::with_capacity(headers.len());
        let mut seen: HashMap<String, &str> = HashMap::new();

        for (idx, header) in headers.iter().enumerate() {
            let snake = to_snake_case(header);
            let slot = match self.lookup.get(&snake) {
                Some(&column) => Slot::Canonical(column),
                None if snake.is_empty() => Slot::Extra(format!("column_{}", idx + 1)),
                None => Slot::Extra(snake),
            };

            if let Some(first) = seen.insert(slot.name().to_string(), header) {
                return Err(Error::schema(format!(
                    "columns `{}` and `{}` both map to `{}`",
                    first.trim(),
                    header.trim(),
                    slot.name()
                )));
            }
            slots.push(slot);
        }

        let present: HashSet<Column> = slots
            .iter()
            .filter_map(|s| match s {
                Slot::Canonical(c) => Some(*c),
                Slot::Extra(_) => None,
            })
            .collect();
        for column in Column::ALL.iter().filter(|c| c.is_required()) {
            if !present.contains(column) {
                return Err(Error::schema(format!(
                    "missing required column `{}`",
                    column
                )));
            }
        }

        Ok(ColumnLayout { slots })
    }
}

impl Default for SchemaMap {
    fn default() -> Self {
        Self::canonical_only()
            .with_synonyms(
                Column::Date,
                &["trade_date", "trading_date", "as_of_date"],
            )
            .with_synonyms(Column::Ticker, &["symbol", "ticker_symbol"])
            .with_synonyms(Column::Sector, &["industry_sector", "gics_sector"])
            .with_synonyms(Column::Exchange, &["listing_exchange", "market"])
            .with_synonyms(Column::Open, &["open_price", "opening_price"])
            .with_synonyms(Column::High, &["high_price", "day_high"])
            .with_synonyms(Column::Low, &["low_price", "day_low"])
            .with_synonyms(
                Column::Close,
                &["close_price", "closing_price", "adj_close", "last_price"],
            )
            .with_synonyms(Column::Volume, &["vol", "traded_volume", "shares_traded"])
            .with_synonyms(Column::Notes, &["note", "comment", "comments", "remarks"])
            .with_synonyms(Column::Validated, &["is_validated", "validation"])
    }
}
