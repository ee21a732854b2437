//! End-to-end tests: raw CSV through the normalizer into every view.

use approx::assert_relative_eq;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use stockdash_aggregation::Aggregator;
use stockdash_core::{CleanTable, NormalizerConfig, TickerFilter, View};
use stockdash_ingestion::{read_csv, Normalizer};

const MARKET_CSV: &str = "\
Trade Date,Ticker,Sector,Exchange,Open Price,Close Price,Volume,Notes,Validated
2023-01-05,aapl,Technology,NASDAQ,148.0,150.0,1000,gap up,Yes
2023/01/06,AAPL,Technology,NASDAQ,158.0,160.0,\"1,200\",Gap up,no
2023-01-05,msft,Technology,NASDAQ,250.0,245.0,800,normal,y
2023-01-09,msft,Technology,NASDAQ,240.0,242.0,NA,gap down,
2023-01-05,xom,Energy,NYSE,80.0,82.0,500,,N/A
2023-01-10,bp,Energy,LSE,30.0,31.0,300,normal,no
";

fn clean(csv: &str) -> CleanTable {
    let raw = read_csv(csv.as_bytes()).unwrap();
    Normalizer::new(&NormalizerConfig::default())
        .normalize(&raw)
        .unwrap()
        .table
}

#[test]
fn test_ticker_mean_price_and_net_change() {
    let table = clean(MARKET_CSV);
    let rows = Aggregator::default().tickers(&table, &TickerFilter::only(["AAPL"]));

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].ticker, "AAPL");
    assert_relative_eq!(rows[0].mean_price().unwrap(), 155.0);
    assert_relative_eq!(rows[0].net_change.unwrap(), 10.0);
    assert_relative_eq!(rows[0].avg_volume.unwrap(), 1100.0);
    assert_eq!(rows[0].validated_count, 1);
}

#[test]
fn test_bad_date_excluded_from_daily_only() {
    let csv = "\
date,ticker,open,close,volume
2023-01-05,AAPL,100,101,10
not-a-date,AAPL,200,202,20
2023-01-06,AAPL,102,103,30
";
    let raw = read_csv(csv.as_bytes()).unwrap();
    let normalized = Normalizer::default().normalize(&raw).unwrap();
    assert_eq!(normalized.report.issue_count(), 1);

    let agg = Aggregator::default();
    let set = agg.aggregate(&normalized.table, &TickerFilter::all());

    let dates: Vec<_> = set.daily.iter().map(|r| r.date).collect();
    assert_eq!(
        dates,
        vec![
            NaiveDate::from_ymd_opt(2023, 1, 5).unwrap(),
            NaiveDate::from_ymd_opt(2023, 1, 6).unwrap(),
        ]
    );
    assert_relative_eq!(set.daily[0].avg_close.unwrap(), 101.0);
    assert_relative_eq!(set.daily[1].avg_close.unwrap(), 103.0);
    // The undated close does not break the gap chain.
    assert_relative_eq!(set.daily[1].avg_gap.unwrap(), 1.0);

    assert_eq!(set.tickers[0].record_count, 3);
    assert_relative_eq!(set.tickers[0].net_change.unwrap(), 2.0);
    assert_eq!(set.diagnostics.without_date, 1);
}

#[test]
fn test_absent_ticker_yields_six_empty_views() {
    let table = clean(MARKET_CSV);
    let set = Aggregator::default().aggregate(&table, &TickerFilter::only(["TSLA"]));

    for view in View::ALL {
        assert_eq!(set.view_len(view), 0, "{view} should be empty");
    }
    assert_eq!(set.diagnostics.records_total, 6);
}

#[test]
fn test_empty_table_yields_six_empty_views() {
    let table = clean("date,ticker,open,close\n");
    assert!(table.is_empty());

    let set = Aggregator::default().aggregate(&table, &TickerFilter::all());
    assert!(set.is_empty());
}

#[test]
fn test_filter_and_complement_partition_groups() {
    let table = clean(MARKET_CSV);
    let agg = Aggregator::default();
    let filter = TickerFilter::only(["AAPL", "XOM"]);
    let rest = filter.complement();

    let all = agg.aggregate(&table, &TickerFilter::all());
    let left = agg.aggregate(&table, &filter);
    let right = agg.aggregate(&table, &rest);

    let mut tickers: Vec<_> = left.tickers.iter().chain(&right.tickers).cloned().collect();
    tickers.sort_by(|a, b| a.ticker.cmp(&b.ticker));
    assert_eq!(tickers, all.tickers);

    let mut by_date: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for row in left.daily.iter().chain(&right.daily) {
        *by_date.entry(row.date).or_default() += row.record_count;
    }
    let expected: BTreeMap<_, _> = all.daily.iter().map(|r| (r.date, r.record_count)).collect();
    assert_eq!(by_date, expected);

    let mut by_sector: BTreeMap<String, usize> = BTreeMap::new();
    for row in left.sectors.iter().chain(&right.sectors) {
        *by_sector.entry(row.sector.clone()).or_default() += row.record_count;
    }
    let expected: BTreeMap<_, _> = all
        .sectors
        .iter()
        .map(|r| (r.sector.clone(), r.record_count))
        .collect();
    assert_eq!(by_sector, expected);
}

#[test]
fn test_market_views() {
    let table = clean(MARKET_CSV);
    let set = Aggregator::default().aggregate(&table, &TickerFilter::all());

    let sectors: Vec<_> = set.sectors.iter().map(|r| r.sector.as_str()).collect();
    assert_eq!(sectors, vec!["energy", "technology"]);

    let countries: Vec<_> = set
        .exchanges
        .iter()
        .map(|r| (r.exchange.as_str(), r.country.as_str()))
        .collect();
    assert_eq!(countries, vec![("lse", "uk"), ("nasdaq", "usa"), ("nyse", "usa")]);

    let notes: Vec<_> = set.notes.iter().map(|r| (r.category.as_str(), r.count)).collect();
    assert_eq!(notes, vec![("gap down", 1), ("gap up", 2), ("normal", 2)]);

    // MSFT opens 240 after closing 245.
    let msft = set.tickers.iter().find(|r| r.ticker == "MSFT").unwrap();
    assert_eq!(msft.gap_down_count, 1);
    assert_eq!(msft.avg_volume, Some(800.0));

    assert_eq!(set.weekly.len(), 2);
    assert_eq!(set.weekly[0].record_count, 4);
    assert_eq!(set.diagnostics.without_notes, 1);
}

#[test]
fn test_complement_covers_records_without_ticker() {
    let csv = "\
date,ticker,sector,open,close,volume
2023-01-05,AAPL,tech,100,101,10
2023-01-05,,energy,50,51,20
2023-01-06,MSFT,tech,200,199,30
";
    let table = clean(csv);
    let agg = Aggregator::default();
    let filter = TickerFilter::only(["AAPL"]);

    let all = agg.aggregate(&table, &TickerFilter::all());
    let left = agg.aggregate(&table, &filter);
    let right = agg.aggregate(&table, &filter.complement());

    let mut sectors: BTreeMap<String, usize> = BTreeMap::new();
    for row in left.sectors.iter().chain(&right.sectors) {
        *sectors.entry(row.sector.clone()).or_default() += row.record_count;
    }
    assert_eq!(sectors, BTreeMap::from([("energy".to_string(), 1), ("tech".to_string(), 2)]));
    assert_eq!(
        left.diagnostics.records_selected + right.diagnostics.records_selected,
        all.diagnostics.records_selected
    );
    assert_eq!(right.diagnostics.without_ticker, 1);
}
