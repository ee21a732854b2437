//! Calendar date parsing.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parses trimmed date text with an ordered list of formats.
#[derive(Debug, Clone)]
pub struct DateParser {
    formats: Vec<String>,
}

impl DateParser {
    /// Create a parser trying `formats` in order.
    pub fn new(formats: &[String]) -> Self {
        Self {
            formats: formats.to_vec(),
        }
    }

    /// Parse a date. Date-times are accepted and truncated to the date.
    ///
    /// Years outside 1000..=9999 are rejected so that a year-first format
    /// cannot swallow a short day-first string.
    pub fn parse(&self, text: &str) -> Option<NaiveDate> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let date = self
            .formats
            .iter()
            .find_map(|fmt| {
                NaiveDate::parse_from_str(text, fmt)
                    .ok()
                    .filter(plausible)
            })
            .or_else(|| {
                DateTime::parse_from_rfc3339(text)
                    .ok()
                    .map(|dt| dt.date_naive())
            })
            .or_else(|| {
                DATETIME_FORMATS
                    .iter()
                    .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                    .map(|dt| dt.date())
            })?;

        plausible(&date).then_some(date)
    }
}

impl Default for DateParser {
    fn default() -> Self {
        Self::new(&stockdash_core::NormalizerConfig::default().date_formats)
    }
}

fn plausible(date: &NaiveDate) -> bool {
    (1000..=9999).contains(&date.year())
}
