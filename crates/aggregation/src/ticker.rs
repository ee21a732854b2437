//! Ticker view: one row per ticker.

use crate::selection::Selection;
use crate::stats::GroupStats;
use std::collections::BTreeMap;
use stockdash_core::TickerRow;

/// Build the ticker view sorted by ticker. Records without a ticker are skipped.
///
/// Undated records count toward the means but not toward `net_change`.
pub fn ticker_view(selection: &Selection<'_>) -> Vec<TickerRow> {
    let mut groups: BTreeMap<&str, GroupStats> = BTreeMap::new();
    for (record, gap) in selection.iter() {
        if let Some(ticker) = record.ticker.as_deref() {
            groups.entry(ticker).or_default().add(record, gap);
        }
    }

    groups
        .into_iter()
        .map(|(ticker, g)| TickerRow {
            ticker: ticker.to_string(),
            record_count: g.count,
            avg_open: g.avg_open(),
            avg_close: g.avg_close(),
            avg_volume: g.avg_volume(),
            net_change: g.net_change(),
            avg_price_change: g.avg_price_change(),
            validated_count: g.validated,
            gap_up_count: g.gap_up,
            gap_down_count: g.gap_down,
            gap_events: g.gap_events(),
        })
        .collect()
}
