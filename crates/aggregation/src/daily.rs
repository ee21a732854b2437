//! Daily view: one row per calendar date.

use crate::selection::Selection;
use crate::stats::GroupStats;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use stockdash_core::DailyRow;

/// Build the daily view in chronological order. Undated records are skipped.
pub fn daily_view(selection: &Selection<'_>) -> Vec<DailyRow> {
    let mut groups: BTreeMap<NaiveDate, GroupStats> = BTreeMap::new();
    for (record, gap) in selection.iter() {
        if let Some(date) = record.date {
            groups.entry(date).or_default().add(record, gap);
        }
    }

    groups
        .into_iter()
        .map(|(date, g)| DailyRow {
            date,
            record_count: g.count,
            avg_open: g.avg_open(),
            avg_close: g.avg_close(),
            total_volume: g.total_volume(),
            avg_gap: g.avg_gap(),
            gap_up_count: g.gap_up,
            gap_down_count: g.gap_down,
            missing_open: g.missing_open,
            missing_close: g.missing_close,
        })
        .collect()
}
