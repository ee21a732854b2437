//! Weekly view: one row per ISO week.

use crate::selection::Selection;
use crate::stats::GroupStats;
use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::BTreeMap;
use stockdash_core::{VolatilityMeasure, WeeklyRow};

/// Build the weekly view in chronological order. Undated records are skipped.
pub fn weekly_view(selection: &Selection<'_>, measure: VolatilityMeasure) -> Vec<WeeklyRow> {
    let mut groups: BTreeMap<(i32, u32), (NaiveDate, GroupStats)> = BTreeMap::new();
    for (record, gap) in selection.iter() {
        let Some(date) = record.date else { continue };
        let week = date.iso_week();
        groups
            .entry((week.year(), week.week()))
            .or_insert_with(|| (date.week(Weekday::Mon).first_day(), GroupStats::new()))
            .1
            .add(record, gap);
    }

    groups
        .into_iter()
        .map(|((iso_year, iso_week), (week_start, g))| WeeklyRow {
            iso_year,
            iso_week,
            week_start,
            record_count: g.count,
            avg_close: g.avg_close(),
            total_volume: g.total_volume(),
            avg_volume: g.avg_volume(),
            volatility: match measure {
                VolatilityMeasure::CloseStdDev => g.close_std_dev(),
                VolatilityMeasure::MeanIntradayChange => g.avg_price_change(),
            },
        })
        .collect()
}
