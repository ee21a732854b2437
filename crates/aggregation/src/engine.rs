//! Aggregation engine.
//!
//! Applies a ticker filter to a cleaned table and builds the six summary
//! views from the same selection.

use crate::{
    category::{exchange_view, sector_view},
    daily::daily_view,
    gaps::GapDetector,
    notes::{notes_view, NoteClassifier},
    selection::Selection,
    ticker::ticker_view,
    weekly::weekly_view,
};
use std::collections::BTreeMap;
use stockdash_core::{
    AggregationConfig, AggregationSet, CleanTable, DailyRow, ExchangeRow, NoteRow, SectorRow,
    TickerFilter, TickerRow, View, VolatilityMeasure, WeeklyRow,
};
use tracing::{debug, info};

/// Builds grouped views from a cleaned table.
///
/// The aggregator holds no table state; every call takes the table and the
/// ticker selection explicitly.
#[derive(Debug, Clone)]
pub struct Aggregator {
    detector: GapDetector,
    volatility: VolatilityMeasure,
    classifier: NoteClassifier,
    /// Lowercase exchange to country.
    countries: BTreeMap<String, String>,
}

impl Aggregator {
    /// Create an aggregator from configuration.
    pub fn new(config: &AggregationConfig) -> Self {
        Self {
            detector: GapDetector::new(config.gap_threshold_pct),
            volatility: config.volatility,
            classifier: NoteClassifier::new(&config.note_rules),
            countries: config
                .exchange_countries
                .iter()
                .map(|(e, c)| (e.trim().to_lowercase(), c.clone()))
                .collect(),
        }
    }

    /// Select the records of `table` matching `filter`, with their gaps.
    pub fn select<'a>(&self, table: &'a CleanTable, filter: &TickerFilter) -> Selection<'a> {
        Selection::new(table, filter, &self.detector)
    }

    /// Build all six views.
    pub fn aggregate(&self, table: &CleanTable, filter: &TickerFilter) -> AggregationSet {
        let selection = self.select(table, filter);
        debug!(
            total = table.len(),
            selected = selection.len(),
            all = filter.is_all(),
            "ticker selection applied"
        );

        let set = AggregationSet {
            daily: daily_view(&selection),
            weekly: weekly_view(&selection, self.volatility),
            tickers: ticker_view(&selection),
            sectors: sector_view(&selection),
            exchanges: exchange_view(&selection, &self.countries),
            notes: notes_view(&selection, &self.classifier),
            diagnostics: selection.diagnostics().clone(),
        };

        info!(
            records = selection.len(),
            daily = set.view_len(View::Daily),
            weekly = set.view_len(View::Weekly),
            tickers = set.view_len(View::Ticker),
            sectors = set.view_len(View::Sector),
            exchanges = set.view_len(View::Exchange),
            notes = set.view_len(View::Notes),
            "aggregation complete"
        );
        set
    }

    pub fn daily(&self, table: &CleanTable, filter: &TickerFilter) -> Vec<DailyRow> {
        daily_view(&self.select(table, filter))
    }

    pub fn weekly(&self, table: &CleanTable, filter: &TickerFilter) -> Vec<WeeklyRow> {
        weekly_view(&self.select(table, filter), self.volatility)
    }

    pub fn tickers(&self, table: &CleanTable, filter: &TickerFilter) -> Vec<TickerRow> {
        ticker_view(&self.select(table, filter))
    }

    pub fn sectors(&self, table: &CleanTable, filter: &TickerFilter) -> Vec<SectorRow> {
        sector_view(&self.select(table, filter))
    }

    pub fn exchanges(&self, table: &CleanTable, filter: &TickerFilter) -> Vec<ExchangeRow> {
        exchange_view(&self.select(table, filter), &self.countries)
    }

    pub fn notes(&self, table: &CleanTable, filter: &TickerFilter) -> Vec<NoteRow> {
        notes_view(&self.select(table, filter), &self.classifier)
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(&AggregationConfig::default())
    }
}
