//! Build summary views for a ticker selection.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use stockdash_aggregation::Aggregator;
use stockdash_core::{AggregationSet, Config, TickerFilter, View};
use tracing::{info, warn};

use crate::cli::AggregateArgs;

use super::load_input;

pub fn run(args: &AggregateArgs, config: &Config) -> Result<()> {
    let normalized = load_input(&args.input, &config.normalizer)?;
    let filter = TickerFilter::only(&args.tickers);
    let set = Aggregator::new(&config.aggregation).aggregate(&normalized.table, &filter);

    let views: Vec<View> = match args.view {
        Some(view) => vec![view.into()],
        None => View::ALL.to_vec(),
    };
    for &view in &views {
        if set.view_len(view) == 0 {
            warn!(%view, "no {view} data for the selected ticker(s)");
        }
    }

    match &args.out_dir {
        Some(dir) => {
            let written = write_views(&set, &views, dir)?;
            info!(dir = %dir.display(), files = written.len(), "wrote aggregation views");
        }
        None => {
            let json = views_json(&set, &views)?;
            let stdout = io::stdout();
            let mut out = stdout.lock();
            if args.pretty {
                serde_json::to_writer_pretty(&mut out, &json)?;
            } else {
                serde_json::to_writer(&mut out, &json)?;
            }
            writeln!(out)?;
        }
    }
    Ok(())
}

/// JSON object with one array per view plus the selection diagnostics.
fn views_json(set: &AggregationSet, views: &[View]) -> Result<Value> {
    let mut map = Map::new();
    for &view in views {
        let rows = match view {
            View::Daily => serde_json::to_value(&set.daily)?,
            View::Weekly => serde_json::to_value(&set.weekly)?,
            View::Ticker => serde_json::to_value(&set.tickers)?,
            View::Sector => serde_json::to_value(&set.sectors)?,
            View::Exchange => serde_json::to_value(&set.exchanges)?,
            View::Notes => serde_json::to_value(&set.notes)?,
        };
        map.insert(view.name().to_string(), rows);
    }
    map.insert("diagnostics".to_string(), serde_json::to_value(&set.diagnostics)?);
    Ok(Value::Object(map))
}

/// Write `agg_<view>.csv` for each non-empty view. Returns the written paths.
fn write_views(set: &AggregationSet, views: &[View], dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;

    let mut written = Vec::new();
    for &view in views {
        if set.view_len(view) == 0 {
            continue;
        }
        let path = dir.join(format!("agg_{view}.csv"));
        match view {
            View::Daily => write_rows(&path, &set.daily)?,
            View::Weekly => write_rows(&path, &set.weekly)?,
            View::Ticker => write_rows(&path, &set.tickers)?,
            View::Sector => write_rows(&path, &set.sectors)?,
            View::Exchange => write_rows(&path, &set.exchanges)?,
            View::Notes => write_rows(&path, &set.notes)?,
        }
        written.push(path);
    }
    Ok(written)
}

fn write_rows<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = csv::Writer::from_writer(file);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
