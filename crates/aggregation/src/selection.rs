//! Records selected by a ticker filter, with their gaps.

use crate::gaps::GapDetector;
use stockdash_core::{CleanRecord, CleanTable, Diagnostics, Gap, TickerFilter};

/// The filtered records of one aggregation call and their gaps.
///
/// Gaps are detected after filtering; because the filter selects whole
/// tickers, a ticker's gaps do not depend on which other tickers are
/// selected.
#[derive(Debug, Clone)]
pub struct Selection<'a> {
    records: Vec<&'a CleanRecord>,
    gaps: Vec<Option<Gap>>,
    diagnostics: Diagnostics,
}

impl<'a> Selection<'a> {
    /// Select the records of `table` matching `filter`.
    pub fn new(table: &'a CleanTable, filter: &TickerFilter, detector: &GapDetector) -> Self {
        let records: Vec<&CleanRecord> = table
            .records
            .iter()
            .filter(|r| filter.matches(r))
            .collect();
        let gaps = detector.detect(&records);

        let count = |pred: fn(&CleanRecord) -> bool| records.iter().filter(|&&r| pred(r)).count();
        let diagnostics = Diagnostics {
            records_total: table.len(),
            records_selected: records.len(),
            without_date: count(|r| r.date.is_none()),
            without_ticker: count(|r| r.ticker.is_none()),
            without_sector: count(|r| r.sector.is_none()),
            without_exchange: count(|r| r.exchange.is_none()),
            without_notes: count(|r| r.notes.is_none()),
            without_prices: count(|r| !r.has_prices()),
        };

        Self {
            records,
            gaps,
            diagnostics,
        }
    }

    /// Records paired with their gaps, in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a CleanRecord, Option<&Gap>)> + '_ {
        self.records
            .iter()
            .copied()
            .zip(self.gaps.iter().map(Option::as_ref))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rec(ticker: Option<&str>, day: u32, open: f64, close: f64) -> CleanRecord {
        CleanRecord {
            date: NaiveDate::from_ymd_opt(2023, 1, day),
            ticker: ticker.map(str::to_string),
            open: Some(open),
            close: Some(close),
            ..Default::default()
        }
    }

    fn table() -> CleanTable {
        CleanTable::new(
            vec!["date".into(), "ticker".into(), "open".into(), "close".into()],
            vec![
                rec(Some("AAPL"), 1, 100.0, 100.0),
                rec(Some("MSFT"), 1, 50.0, 50.0),
                rec(Some("AAPL"), 2, 110.0, 110.0),
                rec(None, 2, 1.0, 1.0),
            ],
        )
    }

    #[test]
    fn test_all_selects_everything() {
        let table = table();
        let sel = Selection::new(&table, &TickerFilter::all(), &GapDetector::default());
        assert_eq!(sel.len(), 4);
        assert_eq!(sel.diagnostics().without_ticker, 1);
        assert_eq!(sel.diagnostics().without_sector, 4);
        assert_eq!(sel.iter().filter(|(_, g)| g.is_some()).count(), 1);
    }

    #[test]
    fn test_filter_keeps_gaps_of_selected_ticker() {
        let table = table();
        let sel = Selection::new(&table, &TickerFilter::only(["aapl"]), &GapDetector::default());
        assert_eq!(sel.len(), 2);
        assert_eq!(sel.diagnostics().records_total, 4);
        assert_eq!(sel.diagnostics().records_selected, 2);

        let gaps: Vec<_> = sel.iter().map(|(_, g)| g.map(|g| g.value)).collect();
        assert_eq!(gaps, vec![None, Some(10.0)]);
    }

    #[test]
    fn test_no_match_is_empty() {
        let table = table();
        let sel = Selection::new(&table, &TickerFilter::only(["TSLA"]), &GapDetector::default());
        assert!(sel.is_empty());
        assert_eq!(sel.diagnostics().records_selected, 0);
    }
}
