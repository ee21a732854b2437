//! Summary statistics and the per-group accumulator shared by all views.

use chrono::NaiveDate;
use statrs::statistics::Statistics;
use std::collections::BTreeSet;
use stockdash_core::{CleanRecord, Gap, GapDirection};

/// Arithmetic mean, `None` for no samples.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().mean())
    }
}

/// Population standard deviation, `None` for no samples.
pub fn population_std_dev(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().population_std_dev())
    }
}

/// Accumulates the records of one group.
///
/// Missing numeric fields are skipped per metric, so a record without a
/// close still counts toward the group and its volume.
#[derive(Debug, Clone, Default)]
pub struct GroupStats {
    /// Records in the group.
    pub count: usize,
    opens: Vec<f64>,
    closes: Vec<f64>,
    volumes: Vec<f64>,
    changes: Vec<f64>,
    gaps: Vec<f64>,
    pub gap_up: usize,
    pub gap_down: usize,
    pub validated: usize,
    pub missing_open: usize,
    pub missing_close: usize,
    tickers: BTreeSet<String>,
    /// Earliest dated close (first seen wins on ties).
    first_close: Option<(NaiveDate, f64)>,
    /// Latest dated close (last seen wins on ties).
    last_close: Option<(NaiveDate, f64)>,
}

impl GroupStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record and its gap, if any.
    pub fn add(&mut self, record: &CleanRecord, gap: Option<&Gap>) {
        self.count += 1;

        match record.open {
            Some(open) => self.opens.push(open),
            None => self.missing_open += 1,
        }
        match record.close {
            Some(close) => {
                self.closes.push(close);
                if let Some(date) = record.date {
                    self.track_close(date, close);
                }
            }
            None => self.missing_close += 1,
        }
        if let Some(volume) = record.volume {
            self.volumes.push(volume);
        }
        if let Some(change) = record.price_change() {
            self.changes.push(change);
        }
        if let Some(gap) = gap {
            self.gaps.push(gap.value);
            match gap.direction {
                GapDirection::Up => self.gap_up += 1,
                GapDirection::Down => self.gap_down += 1,
                GapDirection::Flat => {}
            }
        }
        if record.is_validated() {
            self.validated += 1;
        }
        if let Some(ticker) = &record.ticker {
            if !self.tickers.contains(ticker) {
                self.tickers.insert(ticker.clone());
            }
        }
    }

    fn track_close(&mut self, date: NaiveDate, close: f64) {
        match self.first_close {
            Some((first, _)) if first <= date => {}
            _ => self.first_close = Some((date, close)),
        }
        match self.last_close {
            Some((last, _)) if last > date => {}
            _ => self.last_close = Some((date, close)),
        }
    }

    pub fn avg_open(&self) -> Option<f64> {
        mean(&self.opens)
    }

    pub fn avg_close(&self) -> Option<f64> {
        mean(&self.closes)
    }

    pub fn avg_volume(&self) -> Option<f64> {
        mean(&self.volumes)
    }

    /// Sum of present volumes (0 when none are present).
    pub fn total_volume(&self) -> f64 {
        self.volumes.iter().sum()
    }

    /// Mean of close - open.
    pub fn avg_price_change(&self) -> Option<f64> {
        mean(&self.changes)
    }

    /// Mean of open - previous close over records with a gap.
    pub fn avg_gap(&self) -> Option<f64> {
        mean(&self.gaps)
    }

    /// Population standard deviation of closes.
    pub fn close_std_dev(&self) -> Option<f64> {
        population_std_dev(&self.closes)
    }

    /// Latest dated close minus earliest dated close.
    pub fn net_change(&self) -> Option<f64> {
        let (_, first) = self.first_close?;
        let (_, last) = self.last_close?;
        Some(last - first)
    }

    /// Gap events in either direction.
    pub fn gap_events(&self) -> usize {
        self.gap_up + self.gap_down
    }

    /// Distinct tickers seen.
    pub fn ticker_count(&self) -> usize {
        self.tickers.len()
    }
}
