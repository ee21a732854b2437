//! Sector and exchange views.

use crate::selection::Selection;
use crate::stats::GroupStats;
use std::collections::BTreeMap;
use stockdash_core::{CleanRecord, ExchangeRow, SectorRow};

/// Country reported for exchanges missing from the lookup.
pub const UNKNOWN_COUNTRY: &str = "unknown";

/// Group selected records by a text key. Records without the key are skipped.
pub(crate) fn group_by<F>(selection: &Selection<'_>, key: F) -> BTreeMap<String, GroupStats>
where
    F: Fn(&CleanRecord) -> Option<&str>,
{
    let mut groups: BTreeMap<String, GroupStats> = BTreeMap::new();
    for (record, gap) in selection.iter() {
        if let Some(k) = key(record) {
            groups.entry(k.to_string()).or_default().add(record, gap);
        }
    }
    groups
}

/// One row per sector, sorted by sector name.
pub fn sector_view(selection: &Selection<'_>) -> Vec<SectorRow> {
    group_by(selection, |r| r.sector.as_deref())
        .into_iter()
        .map(|(sector, g)| SectorRow {
            sector,
            record_count: g.count,
            avg_open: g.avg_open(),
            avg_close: g.avg_close(),
            total_volume: g.total_volume(),
            gap_up_count: g.gap_up,
            gap_down_count: g.gap_down,
            gap_events: g.gap_events(),
        })
        .collect()
}

/// One row per exchange, sorted by exchange name, with its country.
pub fn exchange_view(
    selection: &Selection<'_>,
    countries: &BTreeMap<String, String>,
) -> Vec<ExchangeRow> {
    group_by(selection, |r| r.exchange.as_deref())
        .into_iter()
        .map(|(exchange, g)| {
            let country = countries
                .get(&exchange.to_lowercase())
                .cloned()
                .unwrap_or_else(|| UNKNOWN_COUNTRY.to_string());
            ExchangeRow {
                exchange,
                country,
                record_count: g.count,
                avg_open: g.avg_open(),
                avg_close: g.avg_close(),
                total_volume: g.total_volume(),
                gap_up_count: g.gap_up,
                gap_down_count: g.gap_down,
                gap_events: g.gap_events(),
            }
        })
        .collect()
}
