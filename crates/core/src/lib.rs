//! Core types and configuration for the stockdash pipeline.
//!
//! This crate provides shared types used across all other crates:
//! - Raw and cleaned table types
//! - Ticker selection filter
//! - Aggregation view rows
//! - Configuration structures
//! - Common error types

pub mod config;
pub mod error;
pub mod types;

pub use config::{AggregationConfig, Config, NormalizerConfig, NoteRule, VolatilityMeasure};
pub use error::{Error, IssueKind, Result, RowIssue};
pub use types::*;
