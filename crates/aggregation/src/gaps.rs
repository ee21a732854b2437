//! Price gap detection.
//!
//! A gap is a record's open minus the close of the same ticker's previous
//! trading day. Records are ordered by date per ticker; records on the same
//! date keep their input order.

use chrono::NaiveDate;
use std::collections::HashMap;
use stockdash_core::{CleanRecord, Gap, GapDirection};

/// Detects and classifies gaps against a relative threshold.
#[derive(Debug, Clone)]
pub struct GapDetector {
    /// Minimum |gap| / prev_close for an event.
    threshold_pct: f64,
}

impl GapDetector {
    /// Create a detector. `threshold_pct` is a fraction (0.01 = 1%).
    pub fn new(threshold_pct: f64) -> Self {
        Self {
            threshold_pct: threshold_pct.max(0.0),
        }
    }

    /// Classify the gap between a previous close and an open.
    ///
    /// With a non-positive previous close the relative size is undefined, so
    /// the sign of the difference alone decides the direction.
    pub fn classify(&self, prev_close: f64, open: f64) -> Gap {
        let value = open - prev_close;
        let relative = prev_close > 0.0;
        let pct = if relative { value / prev_close } else { 0.0 };

        let direction = if value == 0.0 || (relative && pct.abs() <= self.threshold_pct) {
            GapDirection::Flat
        } else if value > 0.0 {
            GapDirection::Up
        } else {
            GapDirection::Down
        };

        Gap {
            value,
            pct,
            direction,
        }
    }

    /// Gaps aligned with `records`.
    ///
    /// Every record is measured against the last close of the ticker's
    /// latest earlier trading day, so records sharing a date share a
    /// reference close. A record gets `None` when it has no date, ticker or
    /// open, or when no earlier day of its ticker has a close.
    pub fn detect(&self, records: &[&CleanRecord]) -> Vec<Option<Gap>> {
        let mut by_ticker: HashMap<&str, Vec<usize>> = HashMap::new();
        for (idx, record) in records.iter().enumerate() {
            if let (Some(ticker), Some(_)) = (record.ticker.as_deref(), record.date) {
                by_ticker.entry(ticker).or_default().push(idx);
            }
        }

        let mut gaps = vec![None; records.len()];
        for indices in by_ticker.values_mut() {
            // Stable sort keeps same-day records in input order.
            indices.sort_by_key(|&i| records[i].date);

            // Close of the latest earlier trading day, and the last close seen
            // on the current day.
            let mut prev_close: Option<f64> = None;
            let mut day: Option<(NaiveDate, Option<f64>)> = None;
            for &idx in indices.iter() {
                let record = records[idx];
                let Some(date) = record.date else { continue };

                match day {
                    Some((current, _)) if current == date => {}
                    Some((_, last_close)) => {
                        prev_close = last_close.or(prev_close);
                        day = Some((date, None));
                    }
                    None => day = Some((date, None)),
                }

                if let (Some(prev), Some(open)) = (prev_close, record.open) {
                    gaps[idx] = Some(self.classify(prev, open));
                }
                if let (Some(close), Some((_, last_close))) = (record.close, day.as_mut()) {
                    *last_close = Some(close);
                }
            }
        }

        gaps
    }
}

impl Default for GapDetector {
    fn default() -> Self {
        Self::new(stockdash_core::AggregationConfig::default().gap_threshold_pct)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rec(ticker: &str, day: u32, open: Option<f64>, close: Option<f64>) -> CleanRecord {
        CleanRecord {
            date: NaiveDate::from_ymd_opt(2023, 1, day),
            ticker: Some(ticker.to_string()),
            open,
            close,
            ..Default::default()
        }
    }

    #[test]
    fn test_classify() {
        let detector = GapDetector::new(0.01);
        let up = detector.classify(100.0, 102.0);
        assert_eq!(up.direction, GapDirection::Up);
        assert_relative_eq!(up.value, 2.0);
        assert_relative_eq!(up.pct, 0.02);

        assert_eq!(detector.classify(100.0, 97.0).direction, GapDirection::Down);
        assert_eq!(detector.classify(100.0, 100.5).direction, GapDirection::Flat);
        assert_eq!(detector.classify(100.0, 100.0).direction, GapDirection::Flat);
    }

    #[test]
    fn test_zero_threshold_uses_sign() {
        let detector = GapDetector::new(0.0);
        assert_eq!(detector.classify(100.0, 100.01).direction, GapDirection::Up);
        assert_eq!(detector.classify(100.0, 99.99).direction, GapDirection::Down);
        assert_eq!(detector.classify(100.0, 100.0).direction, GapDirection::Flat);
    }

    #[test]
    fn test_detect_orders_by_date_per_ticker() {
        // Out of order and interleaved tickers.
        let a3 = rec("AAPL", 3, Some(120.0), Some(121.0));
        let m1 = rec("MSFT", 1, Some(50.0), Some(50.0));
        let a1 = rec("AAPL", 1, Some(100.0), Some(110.0));
        let a2 = rec("AAPL", 2, Some(109.0), Some(115.0));
        let m2 = rec("MSFT", 2, Some(55.0), Some(56.0));
        let records = vec![&a3, &m1, &a1, &a2, &m2];

        let gaps = GapDetector::new(0.01).detect(&records);

        assert_relative_eq!(gaps[0].unwrap().value, 5.0); // 120 - 115
        assert!(gaps[1].is_none());
        assert!(gaps[2].is_none());
        assert_relative_eq!(gaps[3].unwrap().value, -1.0); // 109 - 110
        assert_eq!(gaps[3].unwrap().direction, GapDirection::Flat);
        assert_eq!(gaps[4].unwrap().direction, GapDirection::Up);
    }

    #[test]
    fn test_missing_close_carries_previous() {
        let d1 = rec("AAPL", 1, Some(100.0), Some(100.0));
        let d2 = rec("AAPL", 2, Some(101.0), None);
        let d3 = rec("AAPL", 3, Some(90.0), Some(91.0));
        let gaps = GapDetector::new(0.01).detect(&[&d1, &d2, &d3]);

        assert_relative_eq!(gaps[1].unwrap().value, 1.0);
        assert_relative_eq!(gaps[2].unwrap().value, -10.0);
    }

    #[test]
    fn test_undated_records_have_no_gap() {
        let d1 = rec("AAPL", 1, Some(100.0), Some(100.0));
        let mut undated = rec("AAPL", 2, Some(150.0), Some(150.0));
        undated.date = None;
        let d3 = rec("AAPL", 3, Some(100.0), Some(100.0));
        let gaps = GapDetector::new(0.01).detect(&[&d1, &undated, &d3]);

        assert!(gaps[1].is_none());
        // The undated close does not count as the previous close.
        assert_relative_eq!(gaps[2].unwrap().value, 0.0);
    }

    #[test]
    fn test_same_day_records_share_previous_close() {
        let d5 = rec("AAPL", 5, Some(100.0), Some(100.0));
        let d6a = rec("AAPL", 6, Some(110.0), Some(120.0));
        let d6b = rec("AAPL", 6, Some(130.0), Some(131.0));
        let d7 = rec("AAPL", 7, Some(132.0), Some(132.0));
        let gaps = GapDetector::new(0.01).detect(&[&d5, &d6a, &d6b, &d7]);

        assert_relative_eq!(gaps[1].unwrap().value, 10.0);
        assert_relative_eq!(gaps[2].unwrap().value, 30.0);
        // Day 7 uses the last close of day 6.
        assert_relative_eq!(gaps[3].unwrap().value, 1.0);
    }

    #[test]
    fn test_same_first_day_has_no_gap() {
        let a = rec("AAPL", 5, Some(100.0), Some(100.0));
        let b = rec("AAPL", 5, Some(101.0), Some(101.0));
        let gaps = GapDetector::new(0.01).detect(&[&a, &b]);
        assert!(gaps.iter().all(Option::is_none));
    }

    #[test]
    fn test_zero_previous_close_uses_sign() {
        let detector = GapDetector::new(0.01);
        let gap = detector.classify(0.0, 5.0);
        assert_eq!(gap.direction, GapDirection::Up);
        assert_relative_eq!(gap.pct, 0.0);
        assert_eq!(detector.classify(0.0, 0.0).direction, GapDirection::Flat);
    }
}
