//! Configuration structures for the stockdash pipeline.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Main configuration for the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Normalizer configuration.
    pub normalizer: NormalizerConfig,
    /// Aggregator configuration.
    pub aggregation: AggregationConfig,
}

impl Config {
    /// Load a configuration from a JSON file. Missing sections and fields
    /// fall back to their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the configured values are usable.
    pub fn validate(&self) -> Result<()> {
        if self.normalizer.date_formats.is_empty() {
            return Err(Error::config("normalizer.date_formats must not be empty"));
        }
        let threshold = self.aggregation.gap_threshold_pct;
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(Error::config(format!(
                "aggregation.gap_threshold_pct must be a non-negative number, got {threshold}"
            )));
        }
        for rule in &self.aggregation.note_rules {
            if rule.category.trim().is_empty() {
                return Err(Error::config("note rule category must not be empty"));
            }
            if rule.keywords.iter().all(|k| k.trim().is_empty()) {
                return Err(Error::config(format!(
                    "note rule `{}` has no keywords",
                    rule.category
                )));
            }
        }
        Ok(())
    }
}

/// Normalizer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NormalizerConfig {
    /// Tokens treated as a missing value (case-insensitive, after trimming).
    pub missing_tokens: Vec<String>,
    /// chrono format strings tried in order when parsing dates.
    pub date_formats: Vec<String>,
    /// Abort normalization on the first unparseable date.
    pub strict_dates: bool,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            missing_tokens: ["", "NA", "N/A", "na", "NaN", "null", "None", "-"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            date_formats: [
                "%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y", "%Y%m%d", "%d %b %Y", "%b %d %Y",
                "%B %d, %Y",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            strict_dates: false,
        }
    }
}

/// How the weekly view measures volatility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolatilityMeasure {
    /// Population standard deviation of closing prices within the week.
    CloseStdDev,
    /// Mean of (close - open) within the week.
    MeanIntradayChange,
}

/// Maps note text to a category when any keyword occurs in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NoteRule {
    /// Category label emitted for matching notes.
    pub category: String,
    /// Substrings (case-insensitive) that select this category.
    pub keywords: Vec<String>,
}

impl NoteRule {
    pub fn new(category: impl Into<String>, keywords: &[&str]) -> Self {
        Self {
            category: category.into(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Aggregator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AggregationConfig {
    /// Minimum |open - prev_close| / prev_close for a gap to count as an event.
    pub gap_threshold_pct: f64,
    /// Volatility measure for the weekly view.
    pub volatility: VolatilityMeasure,
    /// Ordered note classification rules; first match wins.
    pub note_rules: Vec<NoteRule>,
    /// Exchange (lowercase) to country lookup for the exchange view.
    pub exchange_countries: BTreeMap<String, String>,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        let exchange_countries = [
            ("nasdaq", "usa"),
            ("nyse", "usa"),
            ("lse", "uk"),
            ("tse", "japan"),
            ("hkex", "hong kong"),
            ("tsx", "canada"),
        ]
        .iter()
        .map(|(e, c)| (e.to_string(), c.to_string()))
        .collect();

        Self {
            gap_threshold_pct: 0.01,
            volatility: VolatilityMeasure::CloseStdDev,
            note_rules: vec![
                NoteRule::new("gap up", &["gap up"]),
                NoteRule::new("gap down", &["gap down"]),
            ],
            exchange_countries,
        }
    }
}
