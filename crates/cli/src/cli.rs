//! Command-line argument definitions.
//!
//! | Command | Description |
//! |---------|-------------|
//! | `clean` | Normalize a raw CSV and write the cleaned table |
//! | `aggregate` | Normalize, filter by ticker and build summary views |
//! | `tickers` | List the ticker symbols present in a file |
//!
//! Logging is controlled with `RUST_LOG` (default `info`).

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use stockdash_core::View;

/// Clean stock-market CSV exports and summarize them by day, week, ticker,
/// sector, exchange and note.
#[derive(Debug, Parser)]
#[command(name = "stockdash", author, version, about = "Stock-market CSV cleaning and aggregation")]
pub struct Cli {
    /// JSON configuration file. Missing fields use defaults.
    #[arg(long, global = true, value_name = "JSON")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Normalize a raw CSV and write the cleaned table.
    Clean(CleanArgs),
    /// Build summary views for a ticker selection.
    Aggregate(AggregateArgs),
    /// List the ticker symbols present in a file.
    Tickers(TickersArgs),
}

#[derive(Debug, Args)]
pub struct CleanArgs {
    /// Raw CSV input.
    pub input: PathBuf,

    /// Destination of the cleaned CSV.
    #[arg(long, short)]
    pub output: PathBuf,
}

#[derive(Debug, Args)]
pub struct AggregateArgs {
    /// Raw CSV input.
    pub input: PathBuf,

    /// Ticker to include (repeatable). All tickers when omitted.
    #[arg(long = "ticker", short, value_name = "SYM")]
    pub tickers: Vec<String>,

    /// Restrict output to one view.
    #[arg(long, value_enum)]
    pub view: Option<ViewArg>,

    /// Write `agg_<view>.csv` files here instead of printing JSON.
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Pretty-print JSON output.
    #[arg(long, default_value_t = false)]
    pub pretty: bool,
}

#[derive(Debug, Args)]
pub struct TickersArgs {
    /// Raw CSV input.
    pub input: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ViewArg {
    Daily,
    Weekly,
    Ticker,
    Sector,
    Exchange,
    Notes,
}

impl From<ViewArg> for View {
    fn from(value: ViewArg) -> Self {
        match value {
            ViewArg::Daily => View::Daily,
            ViewArg::Weekly => View::Weekly,
            ViewArg::Ticker => View::Ticker,
            ViewArg::Sector => View::Sector,
            ViewArg::Exchange => View::Exchange,
            ViewArg::Notes => View::Notes,
        }
    }
}
