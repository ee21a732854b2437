//! Data ingestion and normalization for the stockdash pipeline.
//!
//! This crate handles:
//! - CSV loading into raw tables
//! - Column-name mapping onto the canonical schema
//! - Date parsing
//! - Text, number, and missing-value normalization
//! - Writing cleaned tables back to CSV

pub mod dates;
pub mod normalizer;
pub mod reader;
pub mod schema;
pub mod writer;

pub use dates::DateParser;
pub use normalizer::{load_clean_table, NormalizationReport, Normalized, Normalizer};
pub use reader::{read_csv, read_csv_path};
pub use schema::{to_snake_case, ColumnLayout, SchemaMap, Slot};
pub use writer::{write_clean_csv, write_clean_csv_path};
