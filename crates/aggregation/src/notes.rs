//! Note classification and the notes view.

use crate::selection::Selection;
use crate::stats::GroupStats;
use std::collections::BTreeMap;
use stockdash_core::{NoteRow, NoteRule};

/// Maps free-text notes to categories.
///
/// Rules are tried in order and the first rule with a keyword contained in
/// the note wins. Unmatched notes are their own category.
#[derive(Debug, Clone, Default)]
pub struct NoteClassifier {
    /// (category, lowercased keywords)
    rules: Vec<(String, Vec<String>)>,
}

impl NoteClassifier {
    pub fn new(rules: &[NoteRule]) -> Self {
        let rules = rules
            .iter()
            .map(|rule| {
                let keywords = rule
                    .keywords
                    .iter()
                    .map(|k| k.trim().to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect();
                (rule.category.clone(), keywords)
            })
            .collect();
        Self { rules }
    }

    /// Category of a note.
    pub fn classify(&self, note: &str) -> String {
        let lowered = note.trim().to_lowercase();
        self.rules
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k.as_str())))
            .map(|(category, _)| category.clone())
            .unwrap_or(lowered)
    }
}

/// Build the notes view sorted by category. Records without notes are skipped.
pub fn notes_view(selection: &Selection<'_>, classifier: &NoteClassifier) -> Vec<NoteRow> {
    let mut groups: BTreeMap<String, GroupStats> = BTreeMap::new();
    for (record, gap) in selection.iter() {
        if let Some(note) = record.notes.as_deref() {
            groups
                .entry(classifier.classify(note))
                .or_default()
                .add(record, gap);
        }
    }

    groups
        .into_iter()
        .map(|(category, g)| NoteRow {
            category,
            count: g.count,
            ticker_count: g.ticker_count(),
            avg_price_change: g.avg_price_change(),
            avg_volume: g.avg_volume(),
            total_volume: g.total_volume(),
        })
        .collect()
}
